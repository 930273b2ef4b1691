//! Options controlling how PO records are assembled into a catalog.

/// Read behavior options for [`crate::traits::Parser`] and [`crate::Codec`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// Keep the header message in the message list as well as in `header`.
    pub keep_header: bool,
    /// Drop messages flagged `fuzzy`.
    pub skip_fuzzy: bool,
    /// Language applied to loaded catalogs, ahead of header and path inference.
    pub language_hint: Option<String>,
}

impl ReadOptions {
    /// Creates default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables keeping the header message.
    pub fn with_keep_header(mut self, keep_header: bool) -> Self {
        self.keep_header = keep_header;
        self
    }

    /// Enables/disables dropping fuzzy messages.
    pub fn with_skip_fuzzy(mut self, skip_fuzzy: bool) -> Self {
        self.skip_fuzzy = skip_fuzzy;
        self
    }

    /// Sets a language hint.
    pub fn with_language_hint(mut self, language_hint: Option<String>) -> Self {
        self.language_hint = language_hint;
        self
    }
}
