/// How a query is matched against an item label. Both are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The whole query occurs somewhere in the label.
    #[default]
    Substring,
    /// Every whitespace-separated query token occurs in the label, in any order.
    AllTokens,
}

/// A trimmed query and its lowercased form, ready for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Query {
    text: String,
    needle: String,
}

impl Query {
    pub(crate) fn parse(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let needle = text.to_lowercase();
        Query { text, needle }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub(crate) fn matches(&self, label: &str, mode: MatchMode) -> bool {
        if self.is_empty() {
            return true;
        }
        let label = label.to_lowercase();
        match mode {
            MatchMode::Substring => label.contains(&self.needle),
            MatchMode::AllTokens => self
                .needle
                .split_whitespace()
                .all(|token| label.contains(token)),
        }
    }
}
