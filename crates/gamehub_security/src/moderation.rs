//! # Moderation Filter
//!
//! Denylist filtering for chat lines and report reasons.
//!
//! ## Rules
//!
//! 1. Matching is a case-insensitive substring search
//! 2. Terms are applied one after another, in denylist order
//! 3. Each pass scans left to right; matches do not overlap within a pass
//! 4. Every match is replaced by the mask; everything else is kept as typed
//!
//! A later term may land on text an earlier term already masked. That is
//! accepted: the output is still fully masked and nothing panics.
//!
//! ## Idempotency
//!
//! Terms may not contain any mask character, so a masked span can never
//! match again and `sanitize(sanitize(x).cleaned) == sanitize(x)` for the
//! cleaned text.

use gamehub_shared::constants::{DEFAULT_DENYLIST, DEFAULT_MASK};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModerationError {
    /// Invalid denylist or mask.
    #[error("invalid moderation configuration: {0}")]
    InvalidConfig(String),
}

/// Moderation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Terms to mask, in the order they are applied.
    pub denylist: Vec<String>,
    /// Replacement for every match.
    pub mask: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(ToString::to_string).collect(),
            mask: DEFAULT_MASK.to_string(),
        }
    }
}

/// Result of filtering one piece of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sanitized {
    /// Text with every denylisted match masked.
    pub cleaned: String,
    /// True if any term matched.
    pub flagged: bool,
}

/// Denylist filter.
///
/// Immutable after construction, so one instance can be shared across
/// threads without coordination.
#[derive(Clone, Debug)]
pub struct ModerationFilter {
    /// Case-folded terms, in application order.
    terms: Vec<Vec<char>>,
    /// Replacement text.
    mask: String,
}

impl Default for ModerationFilter {
    fn default() -> Self {
        Self {
            terms: DEFAULT_DENYLIST.iter().map(|t| fold_term(t)).collect(),
            mask: DEFAULT_MASK.to_string(),
        }
    }
}

impl ModerationFilter {
    /// Builds a filter from config.
    ///
    /// # Errors
    ///
    /// Returns error if the mask is empty, a term is blank, or a term
    /// contains a mask character.
    pub fn new(config: &ModerationConfig) -> Result<Self, ModerationError> {
        if config.mask.is_empty() {
            return Err(ModerationError::InvalidConfig("mask must not be empty".to_string()));
        }
        let mask_chars: Vec<char> = config.mask.chars().map(fold_char).collect();

        let mut terms = Vec::with_capacity(config.denylist.len());
        for term in &config.denylist {
            if term.trim().is_empty() {
                return Err(ModerationError::InvalidConfig("denylist term must not be blank".to_string()));
            }
            let folded = fold_term(term);
            if folded.iter().any(|c| mask_chars.contains(c)) {
                return Err(ModerationError::InvalidConfig(format!(
                    "denylist term {term:?} contains a mask character"
                )));
            }
            terms.push(folded);
        }

        Ok(Self {
            terms,
            mask: config.mask.clone(),
        })
    }

    /// Number of denylist terms.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// The replacement text.
    #[must_use]
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Masks every denylisted match in `text`.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> Sanitized {
        let mut cleaned = text.to_string();
        let mut flagged = false;

        for term in &self.terms {
            if let Some(masked) = mask_term(&cleaned, term, &self.mask) {
                cleaned = masked;
                flagged = true;
            }
        }

        Sanitized { cleaned, flagged }
    }

    /// Returns true if `text` contains any denylisted term.
    #[must_use]
    pub fn is_flagged(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        self.terms
            .iter()
            .any(|term| (0..chars.len()).any(|i| matches_at(&chars[i..], term)))
    }
}

/// Lowercases a char when its lowercase form is a single char.
///
/// Chars whose lowercase expands (e.g. `İ`) are compared as typed.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn fold_term(term: &str) -> Vec<char> {
    term.chars().map(fold_char).collect()
}

fn matches_at(window: &[char], term: &[char]) -> bool {
    window.len() >= term.len() && window.iter().zip(term).all(|(c, t)| fold_char(*c) == *t)
}

/// One left-to-right pass for a single term. Returns `None` if nothing matched.
fn mask_term(text: &str, term: &[char], mask: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut hits = 0usize;
    let mut i = 0;

    while i < chars.len() {
        if matches_at(&chars[i..], term) {
            out.push_str(mask);
            i += term.len();
            hits += 1;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    (hits > 0).then_some(out)
}
