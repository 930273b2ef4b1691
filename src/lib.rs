#![forbid(unsafe_code)]
//! Scanner and reader for gettext PO translation files.
//!
//! The core is [`scanner::Scanner`], a line scanner with one line of
//! lookahead that extracts the raw fields of each message record. On top of
//! it, [`formats::po::Format`] assembles records into [`Message`]s and
//! [`Codec`] loads whole catalogs from disk.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pocodec::Codec;
//!
//! let mut codec = Codec::new();
//! codec.read_file("locale/fr/LC_MESSAGES/app.po", None)?;
//! codec.cache_to_file("catalogs.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod error;
pub mod formats;
pub mod read_options;
pub mod scanner;
pub mod traits;
pub mod types;
pub mod unquote;

// Re-export most used types for easy consumption
pub use crate::{
    codec::Codec,
    error::{Error, UnquoteError},
    formats::FormatType,
    read_options::ReadOptions,
    scanner::Scanner,
    types::{Catalog, Comment, Header, Message},
    unquote::{unquote, unquote_bytes},
};
