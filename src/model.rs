/// One displayable photo, mapped from a provider page entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    /// Provider-assigned identifier; unique within one fetched page.
    pub id: String,
    /// Full-resolution asset URL.
    pub image_url: String,
    pub alt_text: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}

impl ImageItem {
    /// Display caption: the curated description when present, otherwise the
    /// provider's alt text.
    pub fn caption(&self) -> Option<&str> {
        self.description.as_deref().or(self.alt_text.as_deref())
    }
}
