//! Record-level types assembled from the fields the scanner extracts.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

lazy_static! {
    static ref NPLURALS_RE: Regex = Regex::new(r"nplurals\s*=\s*(\d+)").unwrap();
    static ref CHARSET_RE: Regex = Regex::new(r"charset\s*=\s*([^\s;]+)").unwrap();
}

/// The comment lines attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
    /// Free-form translator comments (`# `).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub translator: Vec<String>,

    /// Comments extracted from source code (`#. `).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub extracted: Vec<String>,

    /// Source references (`#: `), one entry per `file:line` token.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub references: Vec<String>,

    /// Flags such as `fuzzy` or `c-format` (`#, `).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub flags: Vec<String>,

    /// Previous context of a fuzzy match (`#| msgctxt `).
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub previous_context: String,

    /// Previous msgid of a fuzzy match (`#| msgid `).
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub previous_id: String,

    /// Previous msgid_plural of a fuzzy match (`#| msgid_plural `).
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub previous_id_plural: String,
}

impl Comment {
    pub fn is_empty(&self) -> bool {
        self == &Comment::default()
    }
}

/// A single translation unit of a PO file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Comment::is_empty")]
    #[serde(default)]
    pub comment: Comment,

    /// Disambiguating context (`msgctxt`).
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub context: String,

    /// Source string (`msgid`).
    pub id: String,

    /// Plural source string (`msgid_plural`).
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub id_plural: String,

    /// Translations: one element for `msgstr`, or `msgstr[0..n]` in order.
    pub strs: Vec<String>,
}

impl Message {
    /// The header is the message with an empty msgid and no context.
    pub fn is_header(&self) -> bool {
        self.id.is_empty() && self.context.is_empty()
    }

    pub fn is_plural(&self) -> bool {
        !self.id_plural.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.comment.flags.iter().any(|f| f == flag)
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag("fuzzy")
    }

    /// Whether every translation slot is filled.
    pub fn is_translated(&self) -> bool {
        !self.strs.is_empty() && self.strs.iter().all(|s| !s.is_empty())
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Message {{ context: {:?}, id: {:?}, strs: {:?} }}",
            self.context, self.id, self.strs
        )
    }
}

/// A loaded catalog: one PO file for a single language and domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    /// The language code (e.g. "fr", "pt-BR"). Empty for templates.
    #[serde(default)]
    pub language: String,

    /// The gettext domain, taken from the file stem (e.g. "messages").
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub domain: String,

    pub header: Header,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Catalog {
    pub fn parse_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.language.replace('_', "-").parse().ok()
    }

    /// Translated, non-fuzzy messages over all non-header messages.
    pub fn translated_ratio(&self) -> f64 {
        let total = self.messages.iter().filter(|m| !m.is_header()).count();
        if total == 0 {
            return 0.0;
        }
        let done = self
            .messages
            .iter()
            .filter(|m| !m.is_header() && !m.is_fuzzy() && m.is_translated())
            .count();
        done as f64 / total as f64
    }
}

/// Metadata fields carried by the header message.
///
/// Fields keep their file order. Lookups ignore key case, the way gettext
/// tools treat `Plural-Forms` and `plural-forms` alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Header {
    pub fields: Vec<(String, String)>,
}

impl Header {
    /// Parses `Key: Value` lines from a header msgstr.
    ///
    /// Blank lines are ignored; any other line without a colon is rejected.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut fields = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| Error::InvalidHeader(format!("missing `:` in `{}`", line)))?;
            fields.push((key.trim().to_string(), value.trim().to_string()));
        }
        Ok(Header { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn language(&self) -> Option<&str> {
        self.get("Language").filter(|lang| !lang.is_empty())
    }

    /// Parses the `Language` field, accepting gettext's `pt_BR` spelling.
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.language()?.replace('_', "-").parse().ok()
    }

    /// The charset named in `Content-Type`, e.g. `UTF-8`.
    pub fn charset(&self) -> Option<&str> {
        let content_type = self.get("Content-Type")?;
        CHARSET_RE
            .captures(content_type)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn plural_forms(&self) -> Option<&str> {
        self.get("Plural-Forms")
    }

    /// The `nplurals` count from `Plural-Forms`.
    pub fn nplurals(&self) -> Option<usize> {
        NPLURALS_RE
            .captures(self.plural_forms()?)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}
