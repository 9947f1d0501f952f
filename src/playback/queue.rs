use crate::library::Song;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// No selection (or nothing to select)
    Empty,
    Positioned(usize),
}

/// Cursor over an ordered list of songs.
///
/// The queue owns a copy of whatever list it was given, so later changes to the
/// caller's collection can't move the cursor underneath it.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    songs: Vec<Song>,
    current: Option<usize>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the backing list. Always clears the selection.
    pub fn set_queue(&mut self, songs: &[Song]) {
        self.songs = songs.to_vec();
        self.current = None;
    }

    /// Move the cursor to `index`.
    ///
    /// Negative deselects; past the end leaves everything as it was.
    pub fn play_at(&mut self, index: isize) -> Option<&Song> {
        if index < 0 {
            self.current = None;
            return None;
        }

        let index = index as usize;
        if index >= self.songs.len() {
            return None;
        }

        self.current = Some(index);
        self.songs.get(index)
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    pub fn next(&mut self) -> Option<&Song> {
        if !self.has_next() {
            return None;
        }
        let index = self.current? + 1;
        self.current = Some(index);
        self.songs.get(index)
    }

    pub fn prev(&mut self) -> Option<&Song> {
        if !self.has_prev() {
            return None;
        }
        let index = self.current? - 1;
        self.current = Some(index);
        self.songs.get(index)
    }

    pub fn has_next(&self) -> bool {
        match self.current {
            Some(index) => index + 1 < self.songs.len(),
            None => false,
        }
    }

    pub fn has_prev(&self) -> bool {
        matches!(self.current, Some(index) if index >= 1 && !self.songs.is_empty())
    }

    pub fn current(&self) -> Option<&Song> {
        self.current.and_then(|index| self.songs.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn state(&self) -> QueueState {
        match self.current {
            Some(index) => QueueState::Positioned(index),
            None => QueueState::Empty,
        }
    }

    /// Where a song sits in the current list, if anywhere
    pub fn position_of(&self, song_id: &str) -> Option<usize> {
        self.songs.iter().position(|s| s.id() == song_id)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs(n: usize) -> Vec<Song> {
        (0..n)
            .map(|i| {
                Song::with_id(
                    format!("id-{}", i),
                    format!("Song {}", i),
                    "Artist",
                    "Album",
                    format!("/music/{}.mp3", i),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_new_queue_is_empty() {
        let mut queue = PlaybackQueue::new();
        assert_eq!(queue.state(), QueueState::Empty);
        assert!(!queue.has_next());
        assert!(!queue.has_prev());
        assert!(queue.next().is_none());
        assert!(queue.play_at(0).is_none());
    }

    #[test]
    fn test_play_at_then_next_reaches_end() {
        let mut queue = PlaybackQueue::new();
        queue.set_queue(&songs(3));

        assert_eq!(queue.play_at(1).unwrap().id(), "id-1");
        assert_eq!(queue.next().unwrap().id(), "id-2");
        assert_eq!(queue.current_index(), Some(2));
        assert!(!queue.has_next());

        assert!(queue.next().is_none());
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn test_prev_at_start_stays_put() {
        let mut queue = PlaybackQueue::new();
        queue.set_queue(&songs(3));
        queue.play_at(0);

        assert!(!queue.has_prev());
        assert!(queue.prev().is_none());
        assert_eq!(queue.current_index(), Some(0));

        queue.play_at(2);
        assert_eq!(queue.prev().unwrap().id(), "id-1");
        assert!(queue.has_prev());
    }

    #[test]
    fn test_negative_index_deselects() {
        let mut queue = PlaybackQueue::new();
        queue.set_queue(&songs(3));
        queue.play_at(1);

        assert!(queue.play_at(-1).is_none());
        assert_eq!(queue.state(), QueueState::Empty);
        assert!(!queue.has_next());
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut queue = PlaybackQueue::new();
        queue.set_queue(&songs(3));
        queue.play_at(1);

        assert!(queue.play_at(3).is_none());
        assert_eq!(queue.state(), QueueState::Positioned(1));
    }

    #[test]
    fn test_set_queue_resets_cursor_and_copies() {
        let mut list = songs(3);
        let mut queue = PlaybackQueue::new();
        queue.set_queue(&list);
        queue.play_at(2);

        list.clear();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current().unwrap().id(), "id-2");

        queue.set_queue(&songs(5));
        assert_eq!(queue.current_index(), None);
        assert_eq!(queue.position_of("id-4"), Some(4));
        assert_eq!(queue.position_of("nope"), None);
    }
}
