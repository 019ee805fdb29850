//! Snapshot diffing.
//!
//! Host widgets report text changes as a pair of snapshots (old, new) with no edit metadata. The
//! functions here recover the single contiguous region that differs, using a common-prefix scan
//! followed by a common-suffix scan over the remaining characters.
//!
//! The suffix scan is bounded by `min(old_len, new_len) - prefix_len`, so the two scans never
//! overlap. For input that really changed in two disjoint places (e.g. autocorrect touching two
//! words at once), the result is the smallest single region covering both changes.
//!
//! All offsets are character offsets.

/// The single contiguous region where two snapshots differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRegion {
    /// Start of the region (identical in both snapshots).
    pub position: usize,
    /// Length of the replaced region in the old snapshot.
    pub old_len: usize,
    /// Length of the replacement region in the new snapshot.
    pub new_len: usize,
}

impl EditRegion {
    /// Exclusive end of the region in the old snapshot.
    pub fn old_end(&self) -> usize {
        self.position + self.old_len
    }

    /// Exclusive end of the region in the new snapshot.
    pub fn new_end(&self) -> usize {
        self.position + self.new_len
    }

    /// Net change in length (`new_len - old_len`).
    pub fn shift(&self) -> isize {
        self.new_len as isize - self.old_len as isize
    }

    /// `true` if the snapshots are identical.
    pub fn is_empty(&self) -> bool {
        self.old_len == 0 && self.new_len == 0
    }

    /// The text inserted by this edit, sliced from the new snapshot.
    pub fn inserted_text<'a>(&self, new_text: &'a str) -> &'a str {
        crate::text::slice_chars(new_text, self.position, self.new_end())
    }
}

/// The region removed by a pure shrink edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionRegion {
    /// Start of the removed region in the old snapshot.
    pub position: usize,
    /// Number of characters removed from the old snapshot.
    pub deleted_len: usize,
}

impl DeletionRegion {
    /// Exclusive end of the removed region in the old snapshot.
    pub fn end(&self) -> usize {
        self.position + self.deleted_len
    }
}

fn common_affixes(old_text: &str, new_text: &str) -> (usize, usize, usize, usize) {
    let old_len = crate::text::char_len(old_text);
    let new_len = crate::text::char_len(new_text);
    let min_len = old_len.min(new_len);

    let prefix_len = old_text
        .chars()
        .zip(new_text.chars())
        .take_while(|(a, b)| a == b)
        .count();

    let suffix_len = old_text
        .chars()
        .rev()
        .zip(new_text.chars().rev())
        .take(min_len - prefix_len)
        .take_while(|(a, b)| a == b)
        .count();

    (old_len, new_len, prefix_len, suffix_len)
}

/// Locate the edited region between two snapshots.
///
/// ```rust
/// use suggesting_box_core::diff::{EditRegion, find_edit_region};
///
/// let region = find_edit_region("abcXdef", "abcYYdef");
/// assert_eq!(region, EditRegion { position: 3, old_len: 1, new_len: 2 });
/// ```
pub fn find_edit_region(old_text: &str, new_text: &str) -> EditRegion {
    let (old_len, new_len, prefix_len, suffix_len) = common_affixes(old_text, new_text);
    EditRegion {
        position: prefix_len,
        old_len: old_len - prefix_len - suffix_len,
        new_len: new_len - prefix_len - suffix_len,
    }
}

/// Locate the removed region of a shrink edit.
///
/// Uses the same scan as [`find_edit_region`]; for a pure deletion `deleted_len` is exactly
/// `old_len - new_len`. For a shrinking replacement it covers the whole replaced span.
pub fn find_deletion_region(old_text: &str, new_text: &str) -> DeletionRegion {
    let (old_len, _, prefix_len, suffix_len) = common_affixes(old_text, new_text);
    DeletionRegion {
        position: prefix_len,
        deleted_len: old_len - prefix_len - suffix_len,
    }
}
