//! Byte-level decoding: character set detection and conversion into logical lines.

use std::borrow::Cow;
use std::ops::Range;

use gw_core::{GedcomError, ParseWarning, REPLACEMENT_CHAR, WarningCode};
use serde::Serialize;

/// Only this much of the file is scanned for a `CHAR` declaration.
const HEADER_SCAN_LIMIT: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoding {
    Ascii,
    Utf8,
    Ansel,
    Utf16Le,
    Utf16Be,
    /// Declared as `ANSI`.
    Windows1252,
}

impl Encoding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Utf8 => "UTF-8",
            Self::Ansel => "ANSEL",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Windows1252 => "ANSI",
        }
    }

    const fn is_utf16(self) -> bool {
        matches!(self, Self::Utf16Le | Self::Utf16Be)
    }
}

/// How the encoding was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionMethod {
    ByteOrderMark,
    /// UTF-16 recognised from the first code unit without a BOM.
    ByteSniffing,
    /// `1 CHAR` inside the header.
    Declaration,
    /// Nothing to go on; ASCII assumed.
    Default,
}

impl DetectionMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByteOrderMark => "byte order mark",
            Self::ByteSniffing => "UTF-16 byte sniffing",
            Self::Declaration => "header CHAR declaration",
            Self::Default => "default ASCII",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedEncoding {
    pub encoding: Encoding,
    pub method: DetectionMethod,
    /// The `CHAR` value exactly as written, if one was found.
    pub declared: Option<String>,
    /// Bytes to skip before decoding.
    pub bom_len: usize,
}

/// One physical line with content, terminator removed and leading whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalLine {
    /// 1-based physical line number.
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedText {
    pub detected: DetectedEncoding,
    pub lines: Vec<LogicalLine>,
}

/// Declared charset names we accept, compared case-insensitively.
fn encoding_for_declaration(declared: &str) -> Option<Encoding> {
    let upper = declared.trim().to_ascii_uppercase();
    match upper.as_str() {
        "ASCII" | "ANSI X3.4-1986" | "US-ASCII" => Some(Encoding::Ascii),
        "ANSEL" => Some(Encoding::Ansel),
        "UTF-8" | "UTF8" => Some(Encoding::Utf8),
        "UNICODE" | "UTF-16" | "UTF16" => Some(Encoding::Utf16Le),
        "ANSI" | "WINDOWS-1252" | "CP1252" => Some(Encoding::Windows1252),
        _ => None,
    }
}

fn bom_encoding(bytes: &[u8]) -> Option<(Encoding, usize)> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some((Encoding::Utf8, 3)),
        [0xFF, 0xFE, ..] => Some((Encoding::Utf16Le, 2)),
        [0xFE, 0xFF, ..] => Some((Encoding::Utf16Be, 2)),
        _ => None,
    }
}

/// A GEDCOM file starts with `0`, CR or LF; in UTF-16 that leaves a zero byte
/// on one side of the first code unit.
fn sniff_utf16(bytes: &[u8]) -> Option<Encoding> {
    match bytes {
        [b'0' | b'\r' | b'\n', 0x00, ..] => Some(Encoding::Utf16Le),
        [0x00, b'0' | b'\r' | b'\n', ..] => Some(Encoding::Utf16Be),
        _ => None,
    }
}

/// Finds the `CHAR` value inside the header record among already-split lines.
///
/// Returns the value and its line number. The header must be the first record, so
/// scanning stops at the first level-0 line that does not open it.
fn find_char_declaration<'a>(
    lines: impl IntoIterator<Item = (usize, &'a str)>,
) -> Option<(String, usize)> {
    let mut in_header = false;
    for (number, text) in lines {
        let mut parts = text.split_whitespace();
        let (Some(level), Some(tag)) = (parts.next(), parts.next()) else {
            continue;
        };
        if level == "0" {
            if in_header || tag != "HEAD" {
                return None;
            }
            in_header = true;
            continue;
        }
        if in_header && level == "1" && tag == "CHAR" {
            let value: Vec<&str> = parts.collect();
            return Some((value.join(" "), number));
        }
    }
    None
}

/// Line spans over `items`, ended by CR, LF, CRLF or LFCR. Yields
/// `(line_number, range)` for every physical line including blank ones.
fn line_spans<T: Copy + PartialEq>(items: &[T], cr: T, lf: T) -> Vec<(usize, Range<usize>)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while index < items.len() {
        let item = items[index];
        if item == cr || item == lf {
            out.push((out.len() + 1, start..index));
            let partner = if item == cr { lf } else { cr };
            if items.get(index + 1) == Some(&partner) {
                index += 1;
            }
            start = index + 1;
        }
        index += 1;
    }
    if start < items.len() {
        out.push((out.len() + 1, start..items.len()));
    }
    out
}

fn split_byte_lines(bytes: &[u8]) -> Vec<(usize, &[u8])> {
    line_spans(bytes, b'\r', b'\n')
        .into_iter()
        .map(|(number, span)| (number, &bytes[span]))
        .collect()
}

/// CR and LF are single bytes in UTF-8, so every span falls on a char boundary.
fn split_text_lines(text: &str) -> Vec<(usize, &str)> {
    line_spans(text.as_bytes(), b'\r', b'\n')
        .into_iter()
        .map(|(number, span)| (number, &text[span]))
        .collect()
}

/// Logical lines of already decoded text, numbered and trimmed the same way as
/// decoded bytes.
pub(crate) fn text_lines(text: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    for (number, line) in split_text_lines(text) {
        push_line(&mut lines, number, line);
    }
    lines
}

/// Chooses the encoding: BOM, then UTF-16 sniffing, then the header `CHAR`
/// declaration, then ASCII.
///
/// # Errors
///
/// Returns [`GedcomError::UnsupportedCharset`] when the header declares a character
/// set this parser cannot decode.
pub fn detect(bytes: &[u8]) -> Result<DetectedEncoding, GedcomError> {
    if let Some((encoding, bom_len)) = bom_encoding(bytes) {
        return Ok(DetectedEncoding {
            encoding,
            method: DetectionMethod::ByteOrderMark,
            declared: None,
            bom_len,
        });
    }
    if let Some(encoding) = sniff_utf16(bytes) {
        return Ok(DetectedEncoding {
            encoding,
            method: DetectionMethod::ByteSniffing,
            declared: None,
            bom_len: 0,
        });
    }

    let window = &bytes[..bytes.len().min(HEADER_SCAN_LIMIT)];
    let ascii_view = String::from_utf8_lossy(window);
    let declaration = find_char_declaration(
        split_text_lines(&ascii_view)
            .into_iter()
            .map(|(number, text)| (number, text.trim_start())),
    );

    match declaration {
        Some((declared, line)) => {
            let encoding = encoding_for_declaration(&declared).ok_or_else(|| {
                GedcomError::UnsupportedCharset {
                    declared: declared.clone(),
                    line,
                }
            })?;
            Ok(DetectedEncoding {
                // The bytes were readable as 8-bit text, so they are not UTF-16
                // whatever the header claims.
                encoding: if encoding.is_utf16() { Encoding::Utf8 } else { encoding },
                method: DetectionMethod::Declaration,
                declared: Some(declared),
                bom_len: 0,
            })
        }
        None => Ok(DetectedEncoding {
            encoding: Encoding::Ascii,
            method: DetectionMethod::Default,
            declared: None,
            bom_len: 0,
        }),
    }
}

/// Detects the encoding and decodes the whole input into logical lines.
///
/// Blank lines are dropped but still counted, so `LogicalLine::number` is always the
/// physical line in the file.
///
/// # Errors
///
/// Fails only when the declared character set is not supported.
pub fn decode(bytes: &[u8], warnings: &mut Vec<ParseWarning>) -> Result<DecodedText, GedcomError> {
    let mut detected = detect(bytes)?;
    let body = &bytes[detected.bom_len..];

    let lines = match detected.encoding {
        Encoding::Utf16Le | Encoding::Utf16Be => {
            decode_utf16_lines(body, detected.encoding, warnings)
        }
        Encoding::Utf8 => decode_byte_lines(&split_byte_lines(body), warnings, decode_utf8_line),
        Encoding::Ascii => decode_byte_lines(&split_byte_lines(body), warnings, decode_ascii_line),
        Encoding::Windows1252 => {
            decode_byte_lines(&split_byte_lines(body), warnings, decode_windows1252_line)
        }
        Encoding::Ansel => decode_ansel_lines(&split_byte_lines(body), warnings),
    };

    // A BOM or sniffed encoding still has to agree with any declaration it carries.
    if detected.method != DetectionMethod::Declaration
        && let Some((declared, line)) = find_char_declaration(
            lines.iter().map(|line| (line.number, line.text.as_str())),
        )
    {
        let declared_encoding = encoding_for_declaration(&declared).ok_or_else(|| {
            GedcomError::UnsupportedCharset {
                declared: declared.clone(),
                line,
            }
        })?;
        let compatible = match detected.encoding {
            Encoding::Utf16Le | Encoding::Utf16Be => declared_encoding == Encoding::Utf16Le,
            other => declared_encoding == other || declared_encoding == Encoding::Ascii,
        };
        if !compatible {
            warnings.push(ParseWarning::at_line(
                WarningCode::CharsetMismatch,
                line,
                format!(
                    "declared character set '{declared}' disagrees with the byte layout; decoding as {}",
                    detected.encoding.as_str()
                ),
            ));
        }
        detected.declared = Some(declared);
    }

    if detected.method == DetectionMethod::Declaration
        && detected
            .declared
            .as_deref()
            .and_then(encoding_for_declaration)
            .is_some_and(Encoding::is_utf16)
    {
        warnings.push(ParseWarning::new(
            WarningCode::CharsetMismatch,
            "UNICODE declared but the file has no UTF-16 byte layout; decoded as UTF-8",
        ));
    }

    Ok(DecodedText { detected, lines })
}

fn push_line(lines: &mut Vec<LogicalLine>, number: usize, text: &str) {
    let trimmed = text.trim_start();
    if trimmed.trim_end().is_empty() {
        return;
    }
    lines.push(LogicalLine {
        number,
        text: trimmed.to_string(),
    });
}

fn decode_byte_lines(
    raw_lines: &[(usize, &[u8])],
    warnings: &mut Vec<ParseWarning>,
    decode_line: fn(&[u8], usize, &mut Vec<ParseWarning>) -> String,
) -> Vec<LogicalLine> {
    let mut lines = Vec::with_capacity(raw_lines.len());
    for (number, raw) in raw_lines {
        let text = decode_line(raw, *number, warnings);
        push_line(&mut lines, *number, &text);
    }
    lines
}

fn unmappable(warnings: &mut Vec<ParseWarning>, line: usize, byte: u8, charset: &str) {
    warnings.push(ParseWarning::at_line(
        WarningCode::UnmappableByte,
        line,
        format!("byte 0x{byte:02X} has no {charset} mapping; replaced with U+FFFD"),
    ));
}

fn decode_ascii_line(raw: &[u8], line: usize, warnings: &mut Vec<ParseWarning>) -> String {
    raw.iter()
        .map(|&byte| {
            if byte.is_ascii() {
                char::from(byte)
            } else {
                unmappable(warnings, line, byte, "ASCII");
                REPLACEMENT_CHAR
            }
        })
        .collect()
}

fn decode_utf8_line(raw: &[u8], line: usize, warnings: &mut Vec<ParseWarning>) -> String {
    match String::from_utf8_lossy(raw) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warnings.push(ParseWarning::at_line(
                WarningCode::UnmappableByte,
                line,
                "invalid UTF-8 sequence replaced with U+FFFD",
            ));
            text
        }
    }
}

/// Windows-1252 differs from Latin-1 only in 0x80..=0x9F.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

fn decode_windows1252_line(raw: &[u8], line: usize, warnings: &mut Vec<ParseWarning>) -> String {
    raw.iter()
        .map(|&byte| match byte {
            0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(byte - 0x80)].unwrap_or_else(|| {
                unmappable(warnings, line, byte, "Windows-1252");
                REPLACEMENT_CHAR
            }),
            _ => char::from(byte),
        })
        .collect()
}

fn decode_utf16_lines(
    body: &[u8],
    encoding: Encoding,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<LogicalLine> {
    let units: Vec<u16> = body
        .chunks(2)
        .map(|pair| match (encoding, pair) {
            (Encoding::Utf16Be, [high, low]) => u16::from_be_bytes([*high, *low]),
            (_, [low, high]) => u16::from_le_bytes([*low, *high]),
            // Odd trailing byte.
            (_, [single]) => u16::from(*single),
            _ => 0,
        })
        .collect();

    let mut lines = Vec::new();
    for (number, span) in line_spans(&units, 0x000D, 0x000A) {
        let mut text = String::with_capacity(span.len());
        let mut bad_units = 0usize;
        for decoded in char::decode_utf16(units[span].iter().copied()) {
            match decoded {
                Ok(ch) => text.push(ch),
                Err(_) => {
                    bad_units += 1;
                    text.push(REPLACEMENT_CHAR);
                }
            }
        }
        if bad_units > 0 {
            warnings.push(ParseWarning::at_line(
                WarningCode::UnmappableByte,
                number,
                format!("{bad_units} unpaired UTF-16 surrogate(s) replaced with U+FFFD"),
            ));
        }
        push_line(&mut lines, number, &text);
    }
    lines
}

/// ANSEL byte to Unicode. `None` means the byte is unassigned.
fn ansel_char(byte: u8) -> Option<char> {
    let ch = match byte {
        0x00..=0x7F => char::from(byte),
        0xA1 => '\u{0141}',
        0xA2 => '\u{00D8}',
        0xA3 => '\u{0110}',
        0xA4 => '\u{00DE}',
        0xA5 => '\u{00C6}',
        0xA6 => '\u{0152}',
        0xA7 => '\u{02B9}',
        0xA8 => '\u{00B7}',
        0xA9 => '\u{266D}',
        0xAA => '\u{00AE}',
        0xAB => '\u{00B1}',
        0xAC => '\u{01A0}',
        0xAD => '\u{01AF}',
        0xAE => '\u{02BC}',
        0xB0 => '\u{02BB}',
        0xB1 => '\u{0142}',
        0xB2 => '\u{00F8}',
        0xB3 => '\u{0111}',
        0xB4 => '\u{00FE}',
        0xB5 => '\u{00E6}',
        0xB6 => '\u{0153}',
        0xB7 => '\u{02BA}',
        0xB8 => '\u{0131}',
        0xB9 => '\u{00A3}',
        0xBA => '\u{00F0}',
        0xBC => '\u{01A1}',
        0xBD => '\u{01B0}',
        0xBE => '\u{25A1}',
        0xBF => '\u{25A0}',
        0xC0 => '\u{00B0}',
        0xC1 => '\u{2113}',
        0xC2 => '\u{2117}',
        0xC3 => '\u{00A9}',
        0xC4 => '\u{266F}',
        0xC5 => '\u{00BF}',
        0xC6 => '\u{00A1}',
        0xC8 => '\u{20AC}',
        0xCD => 'e',
        0xCE => 'o',
        0xCF => '\u{00DF}',
        0xE0 => '\u{0309}',
        0xE1 => '\u{0300}',
        0xE2 => '\u{0301}',
        0xE3 => '\u{0302}',
        0xE4 => '\u{0303}',
        0xE5 => '\u{0304}',
        0xE6 => '\u{0306}',
        0xE7 => '\u{0307}',
        0xE8 => '\u{0308}',
        0xE9 => '\u{030C}',
        0xEA => '\u{030A}',
        0xEB => '\u{FE20}',
        0xEC => '\u{FE21}',
        0xED => '\u{0315}',
        0xEE => '\u{030B}',
        0xEF => '\u{0310}',
        0xF0 => '\u{0327}',
        0xF1 => '\u{0328}',
        0xF2 => '\u{0323}',
        0xF3 => '\u{0324}',
        0xF4 => '\u{0325}',
        0xF5 => '\u{0333}',
        0xF6 => '\u{0332}',
        0xF7 => '\u{0326}',
        0xF8 => '\u{031C}',
        0xF9 => '\u{032E}',
        0xFA => '\u{FE22}',
        0xFB => '\u{FE23}',
        0xFC => '\u{0338}',
        0xFE => '\u{0313}',
        _ => return None,
    };
    Some(ch)
}

/// ANSEL combining marks sit in 0xE0..=0xFE and precede their base character.
const fn is_ansel_diacritic(byte: u8) -> bool {
    byte >= 0xE0
}

/// Decodes one ANSEL line, moving each run of diacritics after the base character
/// that follows it. `carried` holds marks left over from the end of the previous
/// line; they attach to the first base character here. Returns the text and any
/// marks still pending at the end of the line.
fn decode_ansel_line(
    raw: &[u8],
    line: usize,
    carried: Vec<char>,
    warnings: &mut Vec<ParseWarning>,
) -> (String, Vec<char>) {
    let mut out = String::with_capacity(raw.len());
    let mut pending = carried;
    for &byte in raw {
        let Some(ch) = ansel_char(byte) else {
            unmappable(warnings, line, byte, "ANSEL");
            out.push(REPLACEMENT_CHAR);
            out.extend(pending.drain(..));
            continue;
        };
        if is_ansel_diacritic(byte) {
            pending.push(ch);
        } else {
            out.push(ch);
            out.extend(pending.drain(..));
        }
    }
    (out, pending)
}

/// Whether a raw line is a `CONC` continuation (`<level> CONC ...`).
fn is_conc_line(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let mut parts = text.split_whitespace();
    let level_ok = parts
        .next()
        .is_some_and(|level| level.bytes().all(|b| b.is_ascii_digit()));
    level_ok && parts.next() == Some("CONC")
}

fn decode_ansel_lines(
    raw_lines: &[(usize, &[u8])],
    warnings: &mut Vec<ParseWarning>,
) -> Vec<LogicalLine> {
    let mut lines = Vec::with_capacity(raw_lines.len());
    let mut carried: Vec<char> = Vec::new();
    for (index, (number, raw)) in raw_lines.iter().enumerate() {
        let (prefix, value) = if carried.is_empty() {
            (&raw[..0], *raw)
        } else {
            split_conc_prefix(raw)
        };
        let (mut text, _) = decode_ansel_line(prefix, *number, Vec::new(), warnings);
        let (value_text, trailing) =
            decode_ansel_line(value, *number, std::mem::take(&mut carried), warnings);
        text.push_str(&value_text);

        // A bare `CONC` has no base letter to carry onto, so the marks stay here.
        let next_continues_value = raw_lines
            .get(index + 1)
            .is_some_and(|(_, next)| is_conc_line(next) && !split_conc_prefix(next).1.is_empty());
        if next_continues_value && !trailing.is_empty() {
            carried = trailing;
        } else {
            text.extend(trailing);
        }
        push_line(&mut lines, *number, &text);
    }
    lines
}

/// Splits `<ws><level> CONC ` from the value bytes of a continuation line so
/// carried diacritics attach to the value, not the level digit.
fn split_conc_prefix(raw: &[u8]) -> (&[u8], &[u8]) {
    let mut index = 0;
    let skip_ws = |index: &mut usize| {
        while *index < raw.len() && matches!(raw[*index], b' ' | b'\t') {
            *index += 1;
        }
    };
    skip_ws(&mut index);
    while index < raw.len() && raw[index].is_ascii_digit() {
        index += 1;
    }
    skip_ws(&mut index);
    if raw[index..].starts_with(b"CONC") {
        index += 4;
        if index < raw.len() && matches!(raw[index], b' ' | b'\t') {
            index += 1;
        }
    }
    raw.split_at(index)
}
