use chumsky::prelude::*;
use gw_core::{ParseWarning, ParserConfig, WarningCode};
use serde::Serialize;

use crate::encoding::LogicalLine;

/// One line split into `LEVEL [XREF] TAG [VALUE]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub level: u32,
    pub xref: Option<String>,
    pub tag: String,
    /// Everything after the single delimiter following the tag, verbatim.
    pub value: Option<String>,
    pub line: usize,
}

type RawToken<'a> = (&'a str, Option<&'a str>, &'a str, Option<&'a str>);

/// Grammar for a single logical line. The xref is recognised by shape only; whether
/// it is allowed at this level is decided later.
fn line_parser<'a>() -> impl Parser<'a, &'a str, RawToken<'a>, extra::Err<Rich<'a, char>>> {
    let delimiter = any().filter(|c: &char| *c == ' ' || *c == '\t');
    let separator = delimiter.repeated().at_least(1);

    let level = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice();

    let xref = just('@')
        .then(
            any()
                .filter(|c: &char| *c != '@' && !c.is_whitespace())
                .repeated()
                .at_least(1),
        )
        .then(just('@'))
        .to_slice();

    let tag = any()
        .filter(|c: &char| *c != '@' && !c.is_whitespace())
        .then(any().filter(|c: &char| !c.is_whitespace()).repeated())
        .to_slice();

    let value = delimiter.ignore_then(any().repeated().to_slice());

    level
        .then_ignore(separator.clone())
        .then(xref.then_ignore(separator).or_not())
        .then(tag)
        .then(value.or_not())
        .then_ignore(end())
        .map(|(((level, xref), tag), value)| (level, xref, tag, value))
}

/// Splits one logical line. A line that does not fit the grammar comes back as a
/// tokenization warning carrying its line number.
pub fn tokenize_line(line: &LogicalLine, config: &ParserConfig) -> Result<Token, ParseWarning> {
    let text = line.text.trim_start();
    let (raw, errors) = line_parser().parse(text).into_output_errors();
    let Some((level_text, xref, tag, value)) = raw.filter(|_| errors.is_empty()) else {
        let reason = errors
            .first()
            .map_or_else(|| "unrecognised syntax".to_string(), ToString::to_string);
        return Err(ParseWarning::at_line(
            WarningCode::Tokenize,
            line.number,
            format!("cannot tokenize '{}': {reason}", truncate(text)),
        ));
    };

    let level = level_text.parse::<u32>().ok().filter(|level| *level <= config.max_level);
    let Some(level) = level else {
        return Err(ParseWarning::at_line(
            WarningCode::Tokenize,
            line.number,
            format!(
                "level {level_text} exceeds the maximum of {}",
                config.max_level
            ),
        ));
    };

    Ok(Token {
        level,
        xref: xref.map(str::to_string),
        tag: tag.to_string(),
        value: value.filter(|value| !value.is_empty()).map(str::to_string),
        line: line.number,
    })
}

/// Whether a line at least starts like a GEDCOM line (digits then whitespace).
#[must_use]
pub fn has_level_prefix(text: &str) -> bool {
    let trimmed = text.trim_start();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0
        && trimmed[digits..]
            .chars()
            .next()
            .is_some_and(|c| c == ' ' || c == '\t')
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 60;
    if text.chars().count() <= LIMIT {
        return text.to_string();
    }
    let mut short: String = text.chars().take(LIMIT).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::{has_level_prefix, tokenize_line};
    use crate::encoding::LogicalLine;
    use gw_core::{ParserConfig, WarningCode};
    use proptest::prelude::*;

    fn line(number: usize, text: &str) -> LogicalLine {
        LogicalLine {
            number,
            text: text.to_string(),
        }
    }

    fn tokenize(text: &str) -> Result<super::Token, gw_core::ParseWarning> {
        tokenize_line(&line(7, text), &ParserConfig::default())
    }

    #[test]
    fn splits_record_line_with_xref() {
        let token = tokenize("0 @I1@ INDI").expect("valid line");
        assert_eq!(token.level, 0);
        assert_eq!(token.xref.as_deref(), Some("@I1@"));
        assert_eq!(token.tag, "INDI");
        assert_eq!(token.value, None);
        assert_eq!(token.line, 7);
    }

    #[test]
    fn pointer_value_is_not_an_xref() {
        let token = tokenize("1 HUSB @I1@").expect("valid line");
        assert_eq!(token.xref, None);
        assert_eq!(token.tag, "HUSB");
        assert_eq!(token.value.as_deref(), Some("@I1@"));
    }

    #[test]
    fn value_keeps_internal_and_extra_whitespace() {
        let token = tokenize("2 CONC  two  spaces ").expect("valid line");
        assert_eq!(token.value.as_deref(), Some(" two  spaces "));
    }

    #[test]
    fn empty_value_is_none() {
        let token = tokenize("1 BIRT ").expect("valid line");
        assert_eq!(token.value, None);
    }

    #[test]
    fn missing_level_is_a_warning_with_line_number() {
        let warning = tokenize("NAME John").expect_err("no level");
        assert_eq!(warning.code, WarningCode::Tokenize);
        assert_eq!(warning.line, Some(7));
    }

    #[test]
    fn xref_without_tag_is_rejected() {
        assert!(tokenize("0 @I1@").is_err());
    }

    #[test]
    fn level_above_limit_is_rejected() {
        let config = ParserConfig {
            max_level: 3,
            ..ParserConfig::default()
        };
        let warning = tokenize_line(&line(2, "4 DATE 1900"), &config).expect_err("too deep");
        assert!(warning.message.contains("exceeds"));
        assert!(tokenize("99999999999999 TAG").is_err());
    }

    #[test]
    fn level_prefix_detection() {
        assert!(has_level_prefix("1 NOTE x"));
        assert!(has_level_prefix("  12\tTAG"));
        assert!(!has_level_prefix("continued text"));
        assert!(!has_level_prefix("1984"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_tokenizer_is_total(input in ".{0,128}") {
            let _ = tokenize(&input);
        }

        #[test]
        fn prop_well_formed_lines_round_trip(
            level in 0u32..20,
            tag in "[A-Z_]{1,8}",
            value in "[a-zA-Z0-9 ]{0,20}",
        ) {
            let text = if value.is_empty() {
                format!("{level} {tag}")
            } else {
                format!("{level} {tag} {value}")
            };
            let token = tokenize(&text).expect("well-formed line");
            prop_assert_eq!(token.level, level);
            prop_assert_eq!(token.tag, tag);
            prop_assert_eq!(token.value.unwrap_or_default(), value);
        }
    }
}
