//! Confidence scoring for application-store candidates.
//!
//! Scores are integers in `10..=100`. The first rule that matches wins; all
//! comparisons are case-insensitive:
//!
//! | score | rule                                                   |
//! |-------|--------------------------------------------------------|
//! | 100   | term equals the display name                           |
//! | 95    | term equals the identifier                             |
//! | 90    | display name starts with the term                      |
//! | 80    | display name contains the term                         |
//! | 85/75/60 | a term word equals / prefixes / is inside an identifier token |
//! | 50    | display name contains the first word of the term       |
//! | 10    | anything else                                          |

use std::fmt;

pub const EXACT_NAME: u8 = 100;
pub const EXACT_ID: u8 = 95;
pub const NAME_PREFIX: u8 = 90;
pub const NAME_CONTAINS: u8 = 80;
pub const TOKEN_EXACT: u8 = 85;
pub const TOKEN_PREFIX: u8 = 75;
pub const TOKEN_CONTAINS: u8 = 60;
pub const FIRST_WORD: u8 = 50;
/// Never 0: a candidate returned by the store carries at least this much signal.
pub const WEAK: u8 = 10;

/// Score how well `term` matches a candidate's display name and identifier.
pub fn score(term: &str, display_name: &str, identifier: &str) -> u8 {
    let term = term.to_lowercase();
    let name = display_name.to_lowercase();
    let id = identifier.to_lowercase();

    if term == name {
        return EXACT_NAME;
    }
    if term == id {
        return EXACT_ID;
    }
    if name.starts_with(&term) {
        return NAME_PREFIX;
    }
    if name.contains(&term) {
        return NAME_CONTAINS;
    }

    let token_score = identifier_token_score(&term, &id);
    if token_score > 0 {
        return token_score;
    }

    match term.split_whitespace().next() {
        Some(first) if name.contains(first) => FIRST_WORD,
        _ => WEAK,
    }
}

/// Match the words of `term` against the `.`/`_`/`-` separated tokens of an
/// identifier. The first hit in (word, token) order decides; 0 means none.
///
/// `org.zen_browser.zen` yields tokens `org zen browser zen`, so `zen` scores
/// 85 and `brow` scores 75.
fn identifier_token_score(term: &str, identifier: &str) -> u8 {
    let tokens: Vec<&str> = identifier
        .split(['.', '_', '-'])
        .filter(|t| !t.is_empty())
        .collect();

    for word in term.split_whitespace() {
        for token in &tokens {
            if *token == word {
                return TOKEN_EXACT;
            }
            if token.starts_with(word) {
                return TOKEN_PREFIX;
            }
            if token.contains(word) {
                return TOKEN_CONTAINS;
            }
        }
    }
    0
}

/// Human-readable bucket for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceLabel {
    Weak,
    Fair,
    Good,
    Strong,
    Exact,
}

impl ConfidenceLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Exact,
            80..=89 => Self::Strong,
            70..=79 => Self::Good,
            60..=69 => Self::Fair,
            _ => Self::Weak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Strong => "strong",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Weak => "weak",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
