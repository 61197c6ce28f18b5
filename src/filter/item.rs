use crate::campaign::Campaign;

/// Anything that can be listed in a search/select filter.
pub trait SelectableItem {
    /// Text the query is matched against.
    fn label(&self) -> &str;
}

impl SelectableItem for String {
    fn label(&self) -> &str {
        self
    }
}

impl SelectableItem for &str {
    fn label(&self) -> &str {
        self
    }
}

/// Campaigns match on their title, or their id when untitled.
impl SelectableItem for Campaign {
    fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
