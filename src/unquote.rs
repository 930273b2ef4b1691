//! Decoding of the double-quoted, C-escaped string literals found in PO files.

use crate::error::UnquoteError;

/// Decodes one quoted literal such as `"Hello\n"` into its text.
///
/// Octal (`\303`) and hex (`\xc3`) escapes contribute raw bytes, so a run of
/// them may spell a multi-byte UTF-8 character. `\u` and `\U` escapes name a
/// code point directly.
pub fn unquote(literal: &str) -> Result<String, UnquoteError> {
    let bytes = unquote_bytes(literal.as_bytes())?;
    String::from_utf8(bytes).map_err(|_| UnquoteError::InvalidUtf8)
}

/// Decodes one quoted literal into raw bytes, leaving charset decoding to the caller.
///
/// `\u` and `\U` escapes are emitted as UTF-8.
pub fn unquote_bytes(literal: &[u8]) -> Result<Vec<u8>, UnquoteError> {
    if literal.len() < 2 || literal[0] != b'"' || literal[literal.len() - 1] != b'"' {
        return Err(UnquoteError::MissingQuotes);
    }

    let bytes = &literal[1..literal.len() - 1];
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => return Err(UnquoteError::UnescapedQuote),
            b'\n' => return Err(UnquoteError::Newline),
            b'\\' => {
                let Some(&esc) = bytes.get(pos + 1) else {
                    return Err(UnquoteError::TrailingBackslash);
                };
                pos += 2;
                match esc {
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'v' => out.push(0x0b),
                    b'\\' => out.push(b'\\'),
                    b'"' => out.push(b'"'),
                    b'0'..=b'7' => {
                        let digits = bytes
                            .get(pos - 1..pos + 2)
                            .filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)))
                            .ok_or(UnquoteError::InvalidEscape(esc as char))?;
                        let value = digits
                            .iter()
                            .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                        let byte = u8::try_from(value).map_err(|_| {
                            UnquoteError::OctalOutOfRange(String::from_utf8_lossy(digits).into())
                        })?;
                        out.push(byte);
                        pos += 2;
                    }
                    b'x' => {
                        let byte = hex_digits(bytes, pos, 2)
                            .and_then(|value| u8::try_from(value).ok())
                            .ok_or(UnquoteError::InvalidEscape('x'))?;
                        out.push(byte);
                        pos += 2;
                    }
                    b'u' | b'U' => {
                        let width = if esc == b'u' { 4 } else { 8 };
                        let value = hex_digits(bytes, pos, width)
                            .ok_or(UnquoteError::InvalidEscape(esc as char))?;
                        let ch = char::from_u32(value)
                            .ok_or(UnquoteError::InvalidCodePoint(value))?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        pos += width;
                    }
                    _ => {
                        let ch = String::from_utf8_lossy(&bytes[pos - 1..])
                            .chars()
                            .next()
                            .unwrap_or(char::REPLACEMENT_CHARACTER);
                        return Err(UnquoteError::InvalidEscape(ch));
                    }
                }
            }
            byte => {
                out.push(byte);
                pos += 1;
            }
        }
    }

    Ok(out)
}

// Reads exactly `width` hex digits starting at `start`.
fn hex_digits(bytes: &[u8], start: usize, width: usize) -> Option<u32> {
    let digits = bytes.get(start..start + width)?;
    digits.iter().try_fold(0u32, |acc, &d| {
        let nibble = (d as char).to_digit(16)?;
        Some(acc * 16 + nibble)
    })
}
