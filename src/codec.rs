/// This module provides the `Codec` struct for loading gettext catalogs from
/// `.po` and `.pot` files and caching them as JSON.
///
/// Each loaded file becomes one [`Catalog`]. The catalog language is resolved
/// from an explicit hint, the header `Language` field, or the conventional
/// `<lang>/LC_MESSAGES/<domain>.po` and `<lang>.po` layouts.
///
use std::path::Path;

use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    formats::{FormatType, PoFormat},
    read_options::ReadOptions,
    traits::Parser,
    types::Catalog,
};

/// Represents a collection of loaded catalogs and provides methods to read,
/// cache, and reload them.
#[derive(Debug, Default)]
pub struct Codec {
    /// The catalogs managed by this codec, in load order.
    pub catalogs: Vec<Catalog>,
}

impl Codec {
    /// Creates a new, empty `Codec`.
    pub fn new() -> Self {
        Codec {
            catalogs: Vec::new(),
        }
    }

    /// Reads a `.po` or `.pot` file, optionally forcing its language.
    ///
    /// # Parameters
    /// - `path`: Path to the catalog file.
    /// - `lang`: Optional language code to use instead of inferring it.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the file was read and added to `catalogs`,
    /// or an `Error` if the extension is unsupported or parsing fails.
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P, lang: Option<String>) -> Result<(), Error> {
        let options = ReadOptions::new().with_language_hint(lang);
        self.read_file_with_options(path, &options)
    }

    /// Reads a catalog file using explicit [`ReadOptions`].
    pub fn read_file_with_options<P: AsRef<Path>>(
        &mut self,
        path: P,
        options: &ReadOptions,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let format_type = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(FormatType::from_extension)
            .ok_or_else(|| {
                Error::UnsupportedFormat(format!(
                    "Unsupported file extension: {:?}.",
                    path.extension()
                ))
            })?;

        let file = std::fs::File::open(path).map_err(Error::Io)?;
        let format = PoFormat::from_reader_with_options(std::io::BufReader::new(file), options)?;

        let language = options
            .language_hint
            .clone()
            .or_else(|| format.header.language().map(str::to_string))
            .or_else(|| infer_language_from_path(path, format_type))
            .unwrap_or_default();

        let domain = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        debug!(
            path = %path.display(),
            format = %format_type,
            language = %language,
            messages = format.messages.len(),
            "loaded catalog"
        );

        self.catalogs.push(Catalog {
            language,
            domain,
            header: format.header,
            messages: format.messages,
        });

        Ok(())
    }

    /// Returns the first catalog loaded for `language`.
    pub fn get_by_language(&self, language: &str) -> Option<&Catalog> {
        self.catalogs.iter().find(|c| c.language == language)
    }

    /// Caches the current catalogs to a JSON file.
    ///
    /// # Parameters
    /// - `path`: Destination file path for the cache.
    ///
    /// # Returns
    ///
    /// `Ok(())` if caching succeeds, or an `Error` if file I/O or serialization fails.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut writer = std::fs::File::create(path).map_err(Error::Io)?;
        serde_json::to_writer(&mut writer, &self.catalogs).map_err(Error::Parse)?;
        Ok(())
    }

    /// Loads catalogs from a JSON cache file.
    ///
    /// # Returns
    ///
    /// `Ok(Codec)` with loaded catalogs, or an `Error` if loading or deserialization fails.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut reader = std::fs::File::open(path).map_err(Error::Io)?;
        let catalogs: Vec<Catalog> = serde_json::from_reader(&mut reader).map_err(Error::Parse)?;
        Ok(Codec { catalogs })
    }
}

/// Attempts to infer the language from gettext's path conventions:
/// `{lang}/LC_MESSAGES/{domain}.po`, then a `{lang}.po` file name.
///
/// Templates (`.pot`) never carry a language.
fn infer_language_from_path(path: &Path, format_type: FormatType) -> Option<String> {
    if format_type == FormatType::Pot {
        return None;
    }

    let components: Vec<&str> = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if let Some(pos) = components.iter().rposition(|c| *c == "LC_MESSAGES") {
        if let Some(lang) = pos.checked_sub(1).map(|i| components[i]) {
            return Some(lang.to_string());
        }
    }

    let stem = path.file_stem()?.to_str()?;
    let id: LanguageIdentifier = stem.replace('_', "-").parse().ok()?;
    // a bare domain name like "messages" also parses as a language subtag
    (id.language.as_str().len() <= 3).then(|| stem.to_string())
}
