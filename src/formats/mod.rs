pub mod po;

// Reexporting the formats for easier access
pub use po::Format as PoFormat;

/// File kinds the codec knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// A translated catalog (`.po`).
    Po,
    /// A template with empty translations (`.pot`).
    Pot,
}

impl FormatType {
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Po => "po",
            FormatType::Pot => "pot",
        }
    }

    /// Maps a file extension to a format, if supported.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "po" => Some(FormatType::Po),
            "pot" => Some(FormatType::Pot),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Po => write!(f, "Po"),
            FormatType::Pot => write!(f, "Pot"),
        }
    }
}
