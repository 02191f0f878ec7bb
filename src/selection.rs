//! Selection state: the two version cursors and their page cursors.
//!
//! A plain value object owned by the caller and passed explicitly into
//! every diff and aggregate call; nothing in the engine reads ambient
//! state. Navigation that would leave the valid range is ignored.

use crate::store::VersionStore;

/// Two independently movable version cursors plus one page cursor per
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    /// Valid-version index of the left side.
    pub left_version: usize,

    /// Valid-version index of the right side.
    pub right_version: usize,

    /// Page number selected on the left side.
    pub left_page: usize,

    /// Page number selected on the right side.
    pub right_page: usize,
}

impl SelectionState {
    /// Start with both cursors on the first version, first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the left version cursor; no-op at the end of the store.
    pub fn next_left_version(&mut self, store: &VersionStore) {
        if self.left_version + 1 < store.len() {
            self.left_version += 1;
            self.clamp_pages(store);
        }
    }

    /// Step the left version cursor back; no-op at the start.
    pub fn prev_left_version(&mut self, store: &VersionStore) {
        if self.left_version > 0 && self.left_version <= store.len() {
            self.left_version -= 1;
            self.clamp_pages(store);
        }
    }

    /// Advance the right version cursor; no-op at the end of the store.
    pub fn next_right_version(&mut self, store: &VersionStore) {
        if self.right_version + 1 < store.len() {
            self.right_version += 1;
            self.clamp_pages(store);
        }
    }

    /// Step the right version cursor back; no-op at the start.
    pub fn prev_right_version(&mut self, store: &VersionStore) {
        if self.right_version > 0 && self.right_version <= store.len() {
            self.right_version -= 1;
            self.clamp_pages(store);
        }
    }

    /// Advance the left page cursor; no-op past the last page of the
    /// selected version.
    pub fn next_left_page(&mut self, store: &VersionStore) {
        if let Some(version) = store.get(self.left_version) {
            if self.left_page + 1 < version.pages.len() {
                self.left_page += 1;
            }
        }
    }

    /// Step the left page cursor back; no-op at page 0.
    pub fn prev_left_page(&mut self, _store: &VersionStore) {
        self.left_page = self.left_page.saturating_sub(1);
    }

    /// Advance the right page cursor; no-op past the last page of the
    /// selected version.
    pub fn next_right_page(&mut self, store: &VersionStore) {
        if let Some(version) = store.get(self.right_version) {
            if self.right_page + 1 < version.pages.len() {
                self.right_page += 1;
            }
        }
    }

    /// Step the right page cursor back; no-op at page 0.
    pub fn prev_right_page(&mut self, _store: &VersionStore) {
        self.right_page = self.right_page.saturating_sub(1);
    }

    /// Reset a page cursor to 0 when the selected version has fewer
    /// pages than the cursor points at.
    pub fn clamp_pages(&mut self, store: &VersionStore) {
        if let Some(version) = store.get(self.left_version) {
            if self.left_page >= version.pages.len() {
                self.left_page = 0;
            }
        }
        if let Some(version) = store.get(self.right_version) {
            if self.right_page >= version.pages.len() {
                self.right_page = 0;
            }
        }
    }
}
