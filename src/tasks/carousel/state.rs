use crate::events::CarouselSnapshot;
use crate::model::ImageItem;

/// Discrete mode of the carousel, derived from the list contents and the
/// play flag. `Playing` implies a non-empty list; an empty list never keeps
/// a timer armed regardless of the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Empty,
    Paused,
    Playing,
}

/// Core carousel state: the loaded photo list, the cursor, and the play
/// flag.
///
/// Owned exclusively by the carousel task; every mutation goes through one
/// of the methods below, so the cursor can never leave `[0, len)` while the
/// list is non-empty.
#[derive(Debug, Clone)]
pub struct Carousel {
    items: Vec<ImageItem>,
    index: usize,
    playing: bool,
}

impl Carousel {
    /// Starts playing with an empty list; nothing rotates until a list
    /// arrives.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
            playing: true,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.items.is_empty() {
            Mode::Empty
        } else if self.playing {
            Mode::Playing
        } else {
            Mode::Paused
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Cursor position, or `None` while the list is empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.index)
    }

    pub fn current(&self) -> Option<&ImageItem> {
        self.items.get(self.index)
    }

    /// Replaces the photo list wholesale. A list landing on an empty
    /// carousel restarts the cursor at zero; reloading over an existing list
    /// keeps the cursor, clamped into the new bounds when the list shrank.
    pub fn replace_items(&mut self, items: Vec<ImageItem>) {
        let was_empty = self.items.is_empty();
        self.items = items;
        if was_empty || self.items.is_empty() {
            self.index = 0;
        } else if self.index >= self.items.len() {
            self.index = self.items.len() - 1;
        }
    }

    /// Steps forward one photo, wrapping at the end. Returns the new cursor,
    /// or `None` (without moving) on an empty list.
    pub fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.items.len();
        Some(self.index)
    }

    /// Steps back one photo, wrapping at the front. Same empty-list guard as
    /// [`advance`](Self::advance).
    pub fn previous(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.index = (self.index + self.items.len() - 1) % self.items.len();
        Some(self.index)
    }

    /// Flips the play flag and returns the new value. The owning task holds
    /// the actual timer; [`should_tick`](Self::should_tick) says whether one
    /// belongs armed.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// True when automatic advancement needs a live timer: playing, with at
    /// least one photo to rotate through.
    pub fn should_tick(&self) -> bool {
        self.playing && !self.items.is_empty()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            items: self.items.clone(),
            current_index: self.current_index(),
            is_playing: self.playing,
        }
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new()
    }
}
