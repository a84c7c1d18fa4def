//! Ordered Image List
//! The sequence of selected image paths in render order, plus the current selection.

use std::path::{Path, PathBuf};

/// Reorder direction for adjacent swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the sequence (-1)
    Up,
    /// Towards the end of the sequence (+1)
    Down,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// One selected image. Its order is its position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub path: PathBuf,
}

impl ImageEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

/// Ordered image list with an explicit selection index.
///
/// `selected` is always `None` or a valid index into `entries`.
#[derive(Debug, Clone, Default)]
pub struct ImageList {
    entries: Vec<ImageEntry>,
    selected: Option<usize>,
}

impl ImageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path to the end. Existence is checked at encode time, duplicates are fine.
    pub fn append(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(ImageEntry::new(path));
    }

    /// Swap the image at `index` with its neighbour in `direction`.
    ///
    /// Invalid `index` or an out-of-bounds target leaves the list untouched.
    /// Returns true when a swap happened.
    pub fn move_image(&mut self, index: usize, direction: Direction) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let Some(target) = index.checked_add_signed(direction.offset()) else {
            return false;
        };
        if target >= self.entries.len() {
            return false;
        }

        self.entries.swap(index, target);

        // Selection follows whichever image was swapped
        if self.selected == Some(index) {
            self.selected = Some(target);
        } else if self.selected == Some(target) {
            self.selected = Some(index);
        }
        true
    }

    /// Move the selected image, keeping it selected. No-op without a selection.
    pub fn move_selected(&mut self, direction: Direction) -> bool {
        match self.selected {
            Some(index) => self.move_image(index, direction),
            None => false,
        }
    }

    /// Ordered (path, duration) pairs, every image given the same duration.
    pub fn export_sequence(&self, duration: f64) -> Vec<(PathBuf, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.path.clone(), duration))
            .collect()
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(names: &[&str]) -> ImageList {
        let mut list = ImageList::new();
        for name in names {
            list.append(*name);
        }
        list
    }

    fn names(list: &ImageList) -> Vec<String> {
        list.paths().map(|p| p.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn append_keeps_order_and_duplicates() {
        let list = list_of(&["a.jpg", "b.jpg", "a.jpg"]);
        assert_eq!(names(&list), ["a.jpg", "b.jpg", "a.jpg"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn move_up_swaps_with_previous() {
        let mut list = list_of(&["A", "B", "C"]);
        assert!(list.move_image(1, Direction::Up));
        assert_eq!(names(&list), ["B", "A", "C"]);
    }

    #[test]
    fn move_down_past_end_is_noop() {
        let mut list = list_of(&["A", "B", "C"]);
        assert!(!list.move_image(2, Direction::Down));
        assert_eq!(names(&list), ["A", "B", "C"]);
    }

    #[test]
    fn move_up_from_first_is_noop() {
        let mut list = list_of(&["A", "B", "C"]);
        assert!(!list.move_image(0, Direction::Up));
        assert_eq!(names(&list), ["A", "B", "C"]);
    }

    #[test]
    fn move_with_invalid_index_is_silent_noop() {
        let mut list = list_of(&["A", "B"]);
        assert!(!list.move_image(7, Direction::Up));
        assert!(!list.move_image(usize::MAX, Direction::Down));
        assert_eq!(names(&list), ["A", "B"]);

        let mut empty = ImageList::new();
        assert!(!empty.move_image(0, Direction::Down));
        assert!(empty.is_empty());
    }

    #[test]
    fn every_valid_move_swaps_exactly_two_positions() {
        let original = ["A", "B", "C", "D", "E"];
        for index in 0..original.len() {
            for direction in [Direction::Up, Direction::Down] {
                let mut list = list_of(&original);
                let moved = list.move_image(index, direction);
                let target = index as isize + direction.offset();
                let mut expected: Vec<String> = original.iter().map(|s| s.to_string()).collect();
                if target >= 0 && (target as usize) < original.len() {
                    assert!(moved);
                    expected.swap(index, target as usize);
                } else {
                    assert!(!moved);
                }
                assert_eq!(names(&list), expected);
            }
        }
    }

    #[test]
    fn selection_follows_moved_image() {
        let mut list = list_of(&["A", "B", "C"]);
        list.select(0);
        assert!(list.move_selected(Direction::Down));
        assert_eq!(names(&list), ["B", "A", "C"]);
        assert_eq!(list.selected(), Some(1));

        assert!(list.move_selected(Direction::Down));
        assert_eq!(names(&list), ["B", "C", "A"]);
        assert_eq!(list.selected(), Some(2));

        assert!(!list.move_selected(Direction::Down));
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn selection_tracks_neighbour_swap() {
        let mut list = list_of(&["A", "B", "C"]);
        list.select(1);
        list.move_image(0, Direction::Down);
        assert_eq!(names(&list), ["B", "A", "C"]);
        // "B" was selected and is now first
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn move_selected_without_selection_does_nothing() {
        let mut list = list_of(&["A", "B"]);
        assert!(!list.move_selected(Direction::Up));
        assert_eq!(names(&list), ["A", "B"]);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut list = list_of(&["A"]);
        list.select(3);
        assert_eq!(list.selected(), None);
        list.select(0);
        list.append("B");
        assert_eq!(list.selected(), Some(0));
        list.clear_selection();
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn export_sequence_pairs_every_image_with_duration() {
        let list = list_of(&["A", "B"]);
        let seq = list.export_sequence(0.5);
        assert_eq!(
            seq,
            vec![(PathBuf::from("A"), 0.5), (PathBuf::from("B"), 0.5)]
        );
    }

    #[test]
    fn export_sequence_of_empty_list_is_empty() {
        assert!(ImageList::new().export_sequence(1.0).is_empty());
    }

    #[test]
    fn display_name_uses_file_name() {
        let entry = ImageEntry::new("/photos/day1/img_001.jpg");
        assert_eq!(entry.display_name(), "img_001.jpg");
    }
}
