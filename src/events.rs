use crate::model::ImageItem;

/// Single delivery from the fetch task: the provider page, already mapped.
/// An empty list means the fetch failed or returned nothing; the carousel
/// treats both the same way.
#[derive(Debug)]
pub struct ImagesLoaded(pub Vec<ImageItem>);

/// User-facing mutations accepted by the carousel task. This is the only
/// write surface besides the photo list delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Next,
    Previous,
    TogglePlay,
}

/// Read-only view of the carousel, published after every state change.
///
/// `current_index` is `None` exactly while `items` is empty; otherwise it is
/// a valid index into `items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselSnapshot {
    pub items: Vec<ImageItem>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
}

impl CarouselSnapshot {
    /// The photo at the cursor, if any.
    pub fn current(&self) -> Option<&ImageItem> {
        self.current_index.and_then(|idx| self.items.get(idx))
    }
}
