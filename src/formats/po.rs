//! Support for gettext `.po` / `.pot` catalogs.
//!
//! Records are pulled through [`Scanner`] field by field in the order the PO
//! grammar fixes. Writing PO files is not supported.

use std::io::BufRead;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    read_options::ReadOptions,
    scanner::Scanner,
    traits::Parser,
    types::{Comment, Header, Message},
};

/// A parsed PO file: the header plus every message in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Format {
    pub header: Header,
    pub messages: Vec<Message>,
}

impl Format {
    /// Looks up a message by context and msgid. Use `""` for no context.
    pub fn find(&self, context: &str, id: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.context == context && m.id == id && !m.is_header())
    }

    /// Messages that are neither the header nor fuzzy.
    pub fn active_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| !m.is_header() && !m.is_fuzzy())
    }
}

impl Parser for Format {
    fn from_reader_with_options<R: BufRead>(
        reader: R,
        options: &ReadOptions,
    ) -> Result<Self, Error> {
        let mut scanner = Scanner::new(reader);
        let mut header: Option<Header> = None;
        let mut messages = Vec::new();
        let mut pending = Comment::default();

        while scanner.advance_record() {
            let Some(message) = read_message(&mut scanner, &mut pending) else {
                continue;
            };

            if header.is_none() && message.is_header() {
                let parsed = Header::parse(message.strs.first().map_or("", String::as_str))?;
                debug!(fields = parsed.fields.len(), "parsed header");
                if let Some(encoding) = parsed
                    .charset()
                    .and_then(|charset| Encoding::for_label(charset.as_bytes()))
                {
                    scanner.set_encoding(encoding);
                }
                header = Some(parsed);
                if options.keep_header {
                    messages.push(message);
                }
                continue;
            }

            if options.skip_fuzzy && message.is_fuzzy() {
                continue;
            }
            messages.push(message);
        }

        if let Some(err) = scanner.into_error() {
            return Err(err);
        }

        Ok(Format {
            header: header.unwrap_or_default(),
            messages,
        })
    }
}

/// Reads one record. Returns `None` when it has no `msgid` line.
///
/// Comments of such a record are kept in `pending` and attach to the next
/// message when the record ended at a separator, as with the lone `#` line
/// xgettext writes between the file description and the header. A record that
/// stops on an unrecognized line, like obsolete `#~` entries, is dropped whole.
fn read_message<R: BufRead>(scanner: &mut Scanner<R>, pending: &mut Comment) -> Option<Message> {
    let mut comment = std::mem::take(pending);
    read_comment(scanner, &mut comment);
    let context = scanner.extract_quoted("msgctxt ");

    let has_id = scanner
        .current_line()
        .is_some_and(|line| line.starts_with("msgid "));
    if !has_id {
        let at_separator = scanner
            .current_line()
            .is_none_or(|line| line.trim().len() <= 1);
        if at_separator {
            *pending = comment;
        }
        return None;
    }

    Some(Message {
        comment,
        context,
        id: scanner.extract_quoted("msgid "),
        id_plural: scanner.extract_quoted("msgid_plural "),
        strs: scanner.extract_msgstr(),
    })
}

// Comment kinds usually come in this order; repeat until a pass consumes
// nothing so out-of-order lines still land in the right field.
fn read_comment<R: BufRead>(scanner: &mut Scanner<R>, comment: &mut Comment) {
    loop {
        let start = scanner.line_number();

        comment.translator.extend(scanner.extract_repeated("# "));
        comment.extracted.extend(scanner.extract_repeated("#. "));
        comment.references.extend(
            scanner
                .extract_repeated("#: ")
                .iter()
                .flat_map(|line| line.split_whitespace())
                .map(str::to_string),
        );
        comment.flags.extend(
            scanner
                .extract_repeated("#, ")
                .iter()
                .flat_map(|line| line.split([',', ' ', '\t']))
                .filter(|flag| !flag.is_empty())
                .map(str::to_string),
        );

        for (prefix, slot) in [
            ("#| msgctxt ", &mut comment.previous_context),
            ("#| msgid ", &mut comment.previous_id),
            ("#| msgid_plural ", &mut comment.previous_id_plural),
        ] {
            let value = scanner.extract_quoted(prefix);
            if !value.is_empty() {
                *slot = value;
            }
        }

        if scanner.line_number() == start {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::error::UnquoteError;

    const SAMPLE: &str = indoc! {r#"
        # French translations for demo.
        msgid ""
        msgstr ""
        "Project-Id-Version: demo 1.0\n"
        "Language: fr\n"
        "Content-Type: text/plain; charset=UTF-8\n"
        "Plural-Forms: nplurals=2; plural=(n > 1);\n"

        # Shown on the start screen
        #. TRANSLATORS: keep it short
        #: src/main.rs:10 src/main.rs:42
        #: src/ui.rs:7
        #, c-format, no-wrap
        msgid "Hello, %s!"
        msgstr "Bonjour, %s !"

        msgctxt "menu"
        msgid "Open"
        msgstr "Ouvrir"

        #, fuzzy
        #| msgid "%d old file"
        msgid "%d file"
        msgid_plural "%d files"
        msgstr[0] "%d fichier"
        msgstr[1] "%d fichiers"

        #~ msgid "Obsolete"
        #~ msgstr "Obsolète"
    "#};

    #[test]
    fn test_parse_header() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.header.language(), Some("fr"));
        assert_eq!(format.header.nplurals(), Some(2));
        assert_eq!(format.header.charset(), Some("UTF-8"));
        assert!(format.messages.iter().all(|m| !m.is_header()));
    }

    #[test]
    fn test_parse_comments_and_flags() {
        let format = Format::from_str(SAMPLE).unwrap();
        let hello = format.find("", "Hello, %s!").unwrap();
        assert_eq!(hello.comment.translator, vec!["Shown on the start screen"]);
        assert_eq!(hello.comment.extracted, vec!["TRANSLATORS: keep it short"]);
        assert_eq!(
            hello.comment.references,
            vec!["src/main.rs:10", "src/main.rs:42", "src/ui.rs:7"]
        );
        assert_eq!(hello.comment.flags, vec!["c-format", "no-wrap"]);
        assert_eq!(hello.strs, vec!["Bonjour, %s !"]);
    }

    #[test]
    fn test_parse_context() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert!(format.find("", "Open").is_none());
        let open = format.find("menu", "Open").unwrap();
        assert_eq!(open.strs, vec!["Ouvrir"]);
    }

    #[test]
    fn test_parse_plural_with_previous_id() {
        let format = Format::from_str(SAMPLE).unwrap();
        let files = format.find("", "%d file").unwrap();
        assert!(files.is_fuzzy());
        assert!(files.is_plural());
        assert_eq!(files.id_plural, "%d files");
        assert_eq!(files.comment.previous_id, "%d old file");
        assert_eq!(files.strs, vec!["%d fichier", "%d fichiers"]);
    }

    #[test]
    fn test_obsolete_entries_are_dropped() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.messages.len(), 3);
        assert!(format.messages.iter().all(|m| m.id != "Obsolete"));
    }

    #[test]
    fn test_options_keep_header_and_skip_fuzzy() {
        let options = ReadOptions::new()
            .with_keep_header(true)
            .with_skip_fuzzy(true);
        let format = Format::from_reader_with_options(SAMPLE.as_bytes(), &options).unwrap();
        assert_eq!(format.messages.len(), 3);
        assert!(format.messages[0].is_header());
        assert!(format.messages.iter().all(|m| !m.is_fuzzy()));
        assert_eq!(format.active_messages().count(), 2);
    }

    #[test]
    fn test_file_without_header() {
        let format = Format::from_str("msgid \"a\"\nmsgstr \"b\"\n").unwrap();
        assert_eq!(format.header, Header::default());
        assert_eq!(format.messages.len(), 1);
    }

    #[test]
    fn test_malformed_escape_fails_the_parse() {
        let content = indoc! {r#"
            msgid "bad\q"
            msgstr "x"

            msgid "good"
            msgstr "y"
        "#};
        let err = Format::from_str(content).unwrap_err();
        assert!(matches!(
            err,
            Error::Unquote {
                line: 1,
                source: UnquoteError::InvalidEscape('q')
            }
        ));
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let content = "msgid \"\"\nmsgstr \"no colon here\\n\"\n";
        assert!(matches!(
            Format::from_str(content),
            Err(Error::InvalidHeader(_))
        ));
    }

    const XGETTEXT_HEADER: &str = indoc! {r#"
        # SOME DESCRIPTIVE TITLE.
        # Copyright (C) YEAR THE PACKAGE'S COPYRIGHT HOLDER
        # This file is distributed under the same license as the PACKAGE package.
        # FIRST AUTHOR <EMAIL@ADDRESS>, YEAR.
        #
        #, fuzzy
        msgid ""
        msgstr ""
        "Project-Id-Version: PACKAGE VERSION\n"
        "Language: fr\n"
        "MIME-Version: 1.0\n"
        "Content-Type: text/plain; charset=UTF-8\n"
        "Plural-Forms: nplurals=2; plural=(n > 1);\n"

        msgid "a"
        msgstr "b"
    "#};

    #[test]
    fn test_xgettext_header_with_description_comments() {
        let format = Format::from_str(XGETTEXT_HEADER).unwrap();
        assert_eq!(format.header.language(), Some("fr"));
        assert_eq!(format.header.nplurals(), Some(2));
        assert_eq!(format.messages.len(), 1);
        assert_eq!(format.messages[0].id, "a");
        assert!(format.messages[0].comment.is_empty());
    }

    #[test]
    fn test_xgettext_header_keeps_description_comments() {
        let options = ReadOptions::new().with_keep_header(true);
        let format =
            Format::from_reader_with_options(XGETTEXT_HEADER.as_bytes(), &options).unwrap();
        let header = &format.messages[0];
        assert!(header.is_header());
        assert!(header.is_fuzzy());
        assert_eq!(
            header.comment.translator,
            vec![
                "SOME DESCRIPTIVE TITLE.",
                "Copyright (C) YEAR THE PACKAGE'S COPYRIGHT HOLDER",
                "This file is distributed under the same license as the PACKAGE package.",
                "FIRST AUTHOR <EMAIL@ADDRESS>, YEAR.",
            ]
        );
    }

    #[test]
    fn test_repeated_flag_lines() {
        let content = indoc! {r#"
            #, fuzzy
            #, c-format,no-wrap
            msgid "a"
            msgstr "b"
        "#};
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.header, Header::default());
        assert_eq!(format.messages.len(), 1);
        assert_eq!(
            format.messages[0].comment.flags,
            vec!["fuzzy", "c-format", "no-wrap"]
        );
        assert_eq!(format.active_messages().count(), 0);

        let options = ReadOptions::new().with_skip_fuzzy(true);
        let skipped = Format::from_reader_with_options(content.as_bytes(), &options).unwrap();
        assert!(skipped.messages.is_empty());
    }

    #[test]
    fn test_obsolete_record_before_header() {
        let content = indoc! {r#"
            # stale note
            #~ msgid "old"
            #~ msgstr "vieux"

            msgid ""
            msgstr "Language: de\n"

            msgid "a"
            msgstr "b"
        "#};
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.header.language(), Some("de"));
        assert_eq!(format.messages.len(), 1);
        assert!(format.messages[0].comment.translator.is_empty());
    }

    #[test]
    fn test_out_of_order_comment_lines() {
        let content = indoc! {r#"
            #: src/a.rs:1
            # translator note
            #. extracted note
            #: src/b.rs:2
            msgid "a"
            msgstr "b"
        "#};
        let format = Format::from_str(content).unwrap();
        let message = &format.messages[0];
        assert_eq!(message.comment.translator, vec!["translator note"]);
        assert_eq!(message.comment.extracted, vec!["extracted note"]);
        assert_eq!(message.comment.references, vec!["src/a.rs:1", "src/b.rs:2"]);
    }

    #[test]
    fn test_header_charset_decodes_latin1_values() {
        let content = b"msgid \"\"\n\
            msgstr \"\"\n\
            \"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\
            \n\
            #. caf\xe9\n\
            msgid \"caf\xe9\"\n\
            msgstr \"th\xe9\"\n";
        let format = Format::from_bytes(content).unwrap();
        assert_eq!(format.header.charset(), Some("ISO-8859-1"));
        let message = format.find("", "café").unwrap();
        assert_eq!(message.comment.extracted, vec!["café"]);
        assert_eq!(message.strs, vec!["thé"]);
    }
}
