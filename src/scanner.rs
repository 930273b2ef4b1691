//! Line-oriented scanner for the message records of a PO file.
//!
//! The scanner keeps exactly one line of lookahead. Each `extract_*` call
//! tests the current line against a literal prefix and consumes it only when
//! it matches, so callers pull the fields of a record in grammar order:
//!
//! ```rust
//! use std::io::Cursor;
//! use pocodec::scanner::Scanner;
//!
//! let mut scanner = Scanner::new(Cursor::new("msgid \"one\"\nmsgstr \"uno\"\n"));
//! assert!(scanner.advance_record());
//! assert_eq!(scanner.extract_quoted("msgid "), "one");
//! assert_eq!(scanner.extract_msgstr(), vec!["uno".to_string()]);
//! assert!(!scanner.advance_record());
//! assert!(scanner.last_error().is_none());
//! ```

use std::{borrow::Cow, io::BufRead};

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::{
    error::{Error, UnquoteError},
    unquote::unquote_bytes,
};

const BOM: &[u8] = b"\xef\xbb\xbf";

/// Scans the fields of PO message records from a buffered reader.
///
/// Lines are matched as raw bytes; field values are decoded with the scanner's
/// encoding (UTF-8 until [`Scanner::set_encoding`] says otherwise), replacing
/// malformed sequences. A scanner is built once per input stream and walked
/// record by record with [`Scanner::advance_record`] until it returns `false`.
pub struct Scanner<R> {
    reader: R,
    /// The lookahead line, without its line terminator.
    current: Vec<u8>,
    /// Whether `current` holds a line read from the stream.
    has_current: bool,
    /// Set once the stream reports end of input or fails.
    exhausted: bool,
    line_number: usize,
    encoding: &'static Encoding,
    /// First quoted-string decode failure. Never cleared.
    error: Option<Error>,
    /// Failure reported by the underlying reader.
    read_error: Option<Error>,
}

impl<R: BufRead> Scanner<R> {
    /// Creates a scanner with no line buffered yet.
    pub fn new(reader: R) -> Self {
        Scanner {
            reader,
            current: Vec::new(),
            has_current: false,
            exhausted: false,
            line_number: 0,
            encoding: UTF_8,
            error: None,
            read_error: None,
        }
    }

    /// Sets the charset used to decode values from here on, e.g. the one a
    /// header declares.
    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Moves to the first line of the next record.
    ///
    /// Always fetches at least one new line, then skips lines that trim to at
    /// most one byte (empty lines, whitespace, a lone `#`). Returns `false` at
    /// end of input, after a read failure, or once a decode error has been
    /// recorded.
    pub fn advance_record(&mut self) -> bool {
        loop {
            if self.error.is_some() {
                return false;
            }
            if !self.scan() {
                return false;
            }
            if self.current.trim_ascii().len() > 1 {
                debug!(line = self.line_number, "record start");
                return true;
            }
        }
    }

    /// Collects the text of every consecutive line starting with `prefix`.
    pub fn extract_repeated(&mut self, prefix: &str) -> Vec<String> {
        let mut values = Vec::new();
        while self.has_prefix(prefix) {
            values.push(self.text_after(prefix));
            if !self.scan() {
                break;
            }
        }
        values
    }

    /// Splits a single `prefix` line into whitespace-separated tokens.
    pub fn extract_tokens(&mut self, prefix: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        if self.has_prefix(prefix) {
            tokens.extend(self.text_after(prefix).split_whitespace().map(str::to_string));
            self.scan();
        }
        tokens
    }

    /// Returns the trimmed remainder of a single `prefix` line, or an empty string.
    pub fn extract_single(&mut self, prefix: &str) -> String {
        let mut value = String::new();
        if self.has_prefix(prefix) {
            value = self.text_after(prefix);
            self.scan();
        }
        value
    }

    /// Decodes a quoted field and every continuation line that follows it.
    ///
    /// Continuation lines are lines whose first byte is `"`. Each one is
    /// unescaped on its own and appended without a separator. A line that
    /// fails to unescape contributes nothing and records the sticky error.
    pub fn extract_quoted(&mut self, prefix: &str) -> String {
        if !self.has_prefix(prefix) {
            return String::new();
        }

        let mut bytes = Vec::new();
        let unescaped = unquote_bytes(self.current[prefix.len()..].trim_ascii());
        self.settle(unescaped, &mut bytes);

        while self.scan() && self.current.first() == Some(&b'"') {
            let unescaped = unquote_bytes(&self.current);
            self.settle(unescaped, &mut bytes);
        }
        self.decode(&bytes)
    }

    /// Reads the translations of a record.
    ///
    /// A plain `msgstr` yields one element. Otherwise `msgstr[0]`, `msgstr[1]`,
    /// ... are collected in order until the next index is missing.
    pub fn extract_msgstr(&mut self) -> Vec<String> {
        if self.has_prefix("msgstr ") {
            return vec![self.extract_quoted("msgstr ")];
        }

        let mut strs = Vec::new();
        loop {
            let prefix = format!("msgstr[{}] ", strs.len());
            if !self.has_prefix(&prefix) {
                return strs;
            }
            strs.push(self.extract_quoted(&prefix));
        }
    }

    /// The decode error if one was recorded, else the reader's error, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.error.as_ref().or(self.read_error.as_ref())
    }

    /// Consumes the scanner, returning the error [`Scanner::last_error`] reports.
    pub fn into_error(self) -> Option<Error> {
        self.error.or(self.read_error)
    }

    /// The lookahead line, or `None` before the first read and after end of input.
    pub fn current_line(&self) -> Option<Cow<'_, str>> {
        self.has_current.then(|| self.encoding.decode_without_bom_handling(&self.current).0)
    }

    /// 1-based number of the lookahead line; 0 before the first read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    // Replaces the lookahead with the next line of input.
    fn scan(&mut self) -> bool {
        self.current.clear();
        self.has_current = false;
        if self.exhausted {
            return false;
        }

        match self.reader.read_until(b'\n', &mut self.current) {
            Ok(0) => {
                self.exhausted = true;
                false
            }
            Ok(_) => {
                if self.current.ends_with(b"\n") {
                    self.current.pop();
                    if self.current.ends_with(b"\r") {
                        self.current.pop();
                    }
                }
                if self.line_number == 0 && self.current.starts_with(BOM) {
                    self.current.drain(..BOM.len());
                }
                self.line_number += 1;
                self.has_current = true;
                true
            }
            Err(e) => {
                warn!(line = self.line_number + 1, error = %e, "read failed");
                self.current.clear();
                self.exhausted = true;
                self.read_error = Some(Error::Io(e));
                false
            }
        }
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.has_current && self.current.starts_with(prefix.as_bytes())
    }

    fn text_after(&self, prefix: &str) -> String {
        self.decode(self.current[prefix.len()..].trim_ascii())
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (text, malformed) = self.encoding.decode_without_bom_handling(bytes);
        if malformed {
            debug!(
                line = self.line_number,
                encoding = self.encoding.name(),
                "replaced malformed byte sequence"
            );
        }
        text.into_owned()
    }

    // Keeps the first unescape failure; the failing line contributes nothing.
    fn settle(&mut self, unescaped: Result<Vec<u8>, UnquoteError>, out: &mut Vec<u8>) {
        match unescaped {
            Ok(bytes) => out.extend_from_slice(&bytes),
            Err(source) => {
                if self.error.is_none() {
                    warn!(line = self.line_number, error = %source, "malformed quoted string");
                    self.error = Some(Error::unquote(self.line_number, source));
                }
            }
        }
    }
}
