//! Normalization and tokenization of raw phrases.
//!
//! The tokenizer never fails: anything it does not recognize becomes an opaque
//! [`Token::Word`], so later stages can skip it rather than rejecting the
//! whole phrase.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Scans a lower-cased phrase. Alternation order matters: meridiem markers are
/// tried before plain words so "a.m." is not split into "a" and "m".
///
/// The verb "am" ("I am free") also scans as a marker. Rules only read a
/// marker right after an hour, so a stray one is ignored.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
          (?P<meridiem>[ap]\.m\.?|[ap]m\b)
        | (?P<number>\d+)(?P<suffix>st|nd|rd|th)?
        | (?P<word>[a-z]+)
        | (?P<dash>[-\u{2013}\u{2014}])
        | (?P<colon>:)
        | (?P<comma>,)
        ",
    )
    .expect("token pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Convert a 12-hour clock hour (1-12) to 24-hour form.
    pub(crate) fn to_24h(self, hour: u32) -> u32 {
        match (hour, self) {
            (12, Meridiem::Am) => 0,
            (12, Meridiem::Pm) => 12,
            (h, Meridiem::Am) => h,
            (h, Meridiem::Pm) => h + 12,
        }
    }

    pub(crate) fn flip(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    Dash,
    Colon,
    Comma,
    To,
    From,
    At,
    On,
    Until,
    Through,
    Between,
    And,
}

impl Separator {
    /// Separators that bind a start anchor to an end anchor.
    ///
    /// `and` only counts after `between`, which the assembler checks itself.
    pub(crate) fn is_range_connector(self) -> bool {
        matches!(
            self,
            Separator::Dash | Separator::To | Separator::Until | Separator::Through
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Word(String),
    /// An integer literal. `digits` keeps the written width ("00" is 2).
    Number {
        value: u32,
        digits: usize,
    },
    Ordinal(u32),
    Meridiem(Meridiem),
    Separator(Separator),
}

impl Token {
    pub(crate) fn word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }

    pub(crate) fn separator(&self) -> Option<Separator> {
        match self {
            Token::Separator(s) => Some(*s),
            _ => None,
        }
    }

    pub(crate) fn is_separator(&self, sep: Separator) -> bool {
        self.separator() == Some(sep)
    }
}

/// Split `input` into typed tokens.
///
/// Lower-cases and trims the input, drops articles and unrecognized
/// punctuation.
pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let normalized = input.trim().to_lowercase();
    TOKEN_PATTERN
        .captures_iter(&normalized)
        .filter_map(|caps| classify(&caps))
        .collect()
}

fn classify(caps: &Captures<'_>) -> Option<Token> {
    if let Some(m) = caps.name("meridiem") {
        let marker = if m.as_str().starts_with('a') {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };
        return Some(Token::Meridiem(marker));
    }

    if let Some(m) = caps.name("number") {
        let text = m.as_str();
        let Ok(value) = text.parse::<u32>() else {
            return Some(Token::Word(caps[0].to_string()));
        };
        if caps.name("suffix").is_some() {
            return Some(Token::Ordinal(value));
        }
        return Some(Token::Number {
            value,
            digits: text.len(),
        });
    }

    if let Some(m) = caps.name("word") {
        let token = match m.as_str() {
            "the" => return None,
            "to" => Token::Separator(Separator::To),
            "from" => Token::Separator(Separator::From),
            "at" | "by" => Token::Separator(Separator::At),
            "on" => Token::Separator(Separator::On),
            "until" | "till" | "til" => Token::Separator(Separator::Until),
            "through" | "thru" => Token::Separator(Separator::Through),
            "between" => Token::Separator(Separator::Between),
            "and" => Token::Separator(Separator::And),
            word => Token::Word(word.to_string()),
        };
        return Some(token);
    }

    if caps.name("dash").is_some() {
        return Some(Token::Separator(Separator::Dash));
    }
    if caps.name("colon").is_some() {
        return Some(Token::Separator(Separator::Colon));
    }
    if caps.name("comma").is_some() {
        return Some(Token::Separator(Separator::Comma));
    }
    None
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: u32, digits: usize) -> Token {
        Token::Number { value, digits }
    }

    #[test]
    fn test_tokenize_clock_range() {
        assert_eq!(
            tokenize("  Tomorrow 9AM-5pm "),
            vec![
                Token::Word("tomorrow".into()),
                num(9, 1),
                Token::Meridiem(Meridiem::Am),
                Token::Separator(Separator::Dash),
                num(5, 1),
                Token::Meridiem(Meridiem::Pm),
            ]
        );
    }

    #[test]
    fn test_tokenize_colon_time_keeps_width() {
        assert_eq!(
            tokenize("10:00"),
            vec![num(10, 2), Token::Separator(Separator::Colon), num(0, 2)]
        );
    }

    #[test]
    fn test_tokenize_dotted_meridiem() {
        assert_eq!(
            tokenize("3 p.m."),
            vec![num(3, 1), Token::Meridiem(Meridiem::Pm)]
        );
    }

    #[test]
    fn test_tokenize_ordinal_and_separators() {
        assert_eq!(
            tokenize("from the 20th of January, to friday"),
            vec![
                Token::Separator(Separator::From),
                Token::Ordinal(20),
                Token::Word("of".into()),
                Token::Word("january".into()),
                Token::Separator(Separator::Comma),
                Token::Separator(Separator::To),
                Token::Word("friday".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_drops_unknown_punctuation() {
        assert_eq!(
            tokenize("today!?"),
            vec![Token::Word("today".into())]
        );
    }

    #[test]
    fn test_tokenize_oversized_number_is_opaque() {
        assert_eq!(
            tokenize("99999999999"),
            vec![Token::Word("99999999999".into())]
        );
    }

    #[test]
    fn test_tokenize_verb_am_is_a_marker() {
        assert_eq!(
            tokenize("I am free"),
            vec![
                Token::Word("i".into()),
                Token::Meridiem(Meridiem::Am),
                Token::Word("free".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_meridiem_to_24h() {
        assert_eq!(Meridiem::Am.to_24h(12), 0);
        assert_eq!(Meridiem::Pm.to_24h(12), 12);
        assert_eq!(Meridiem::Pm.to_24h(3), 15);
        assert_eq!(Meridiem::Am.to_24h(9), 9);
    }
}
