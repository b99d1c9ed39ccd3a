//! Extraction of a single obligation's SMT-LIB translation from a verifier log.
//!
//! The verifier prints the translation of every proof obligation after a header line of the form
//! `SMT TRANSLATION OF <tag>`, followed by a single separator character and the SMT-LIB commands.
//! The log is not parsed as SMT-LIB; the block is delimited purely textually by the header marker
//! and the first `(check-sat)` that follows it.

use std::fmt::Display;

use crate::error::ExtractionError;

/// The literal prefix of the header that introduces a translation block.
pub const HEADER_PREFIX: &str = "SMT TRANSLATION OF ";

/// The command that terminates every extracted script.
pub const CHECK_SAT: &str = "(check-sat)";

/// Identifies one proof obligation in the log.
/// The tag is used as a literal search key, it is neither parsed nor normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObligationTag(String);

impl ObligationTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The header marker that precedes the translation of this obligation.
    pub fn marker(&self) -> String {
        format!("{}{}", HEADER_PREFIX, self.0)
    }
}

impl From<&str> for ObligationTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ObligationTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Display for ObligationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A self-contained SMT-LIB script that ends with exactly one `(check-sat)` command.
/// Instances are only created by [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBlock(String);

impl TranslationBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for TranslationBlock {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TranslationBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracts the translation of the obligation identified by `tag` from the verifier log.
///
/// The block starts after the first occurrence of the header marker for `tag` and the separator
/// character following it, and ends before the first `(check-sat)` after that.
/// Everything following the `(check-sat)` is discarded and a fresh `(check-sat)` is appended, so
/// the result is terminated by exactly one check regardless of the trailing log content.
///
/// If `tag` is a prefix of another tag whose translation occurs earlier in the log, that earlier
/// block is returned. Tags are matched literally.
pub fn extract(log: &str, tag: &ObligationTag) -> Result<TranslationBlock, ExtractionError> {
    let marker = tag.marker();
    let start = log
        .find(&marker)
        .ok_or_else(|| ExtractionError::TagNotFound(tag.to_string()))?;
    log::debug!("Found header of `{}` at offset {}", tag, start);

    let region = log[start + marker.len()..].trim();

    // Skip the separator between the header and the commands
    let mut chars = region.chars();
    if chars.next().is_none() {
        return Err(ExtractionError::MalformedBlock(tag.to_string()));
    }
    let region = chars.as_str();

    let end = region
        .find(CHECK_SAT)
        .ok_or_else(|| ExtractionError::MissingCheckSat(tag.to_string()))?;
    let body = region[..end].trim();
    if body.is_empty() {
        return Err(ExtractionError::MalformedBlock(tag.to_string()));
    }

    let mut script = String::with_capacity(body.len() + CHECK_SAT.len() + 2);
    script.push_str(body);
    script.push('\n');
    script.push_str(CHECK_SAT);
    script.push('\n');
    log::debug!("Extracted {} bytes of SMT-LIB for `{}`", script.len(), tag);
    Ok(TranslationBlock(script))
}
