//! Document identifiers: strict validation and filesystem-safe naming.
//!
//! A title arrives from an untrusted HTTP path segment and is used in two
//! distinct roles that must never be conflated:
//!
//! - the *strict* form gates whether an operation is allowed at all
//!   (ASCII alphanumeric, non-empty, nothing else);
//! - the *safe* form is a lossy substitution used only for file naming,
//!   after the strict gate has already passed.
//!
//! [`DocumentId`] ties the two together: it can only be constructed through
//! the strict parse, so every component that takes a `&DocumentId` gets the
//! strict check as a precondition enforced by the type system rather than by
//! call-site discipline. The lossy [`safe_filename`] stays available on its
//! own for read-only lookup paths that normalize rather than reject.

use crate::error::WikiError;
use std::fmt;

/// A validated document title.
///
/// Invariant: the inner string is non-empty and ASCII alphanumeric, so it is
/// always equal to its own safe filename and contains no path separators,
/// dots, or shell metacharacters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Parse a user-supplied title, rejecting anything outside `[A-Za-z0-9]+`.
    ///
    /// Rejection is a hard error with no side effects; callers map it to a
    /// client error at the request boundary.
    pub fn parse(title: &str) -> Result<Self, WikiError> {
        if is_strict(title) {
            Ok(Self(title.to_owned()))
        } else {
            Err(WikiError::InvalidTitle(title.to_owned()))
        }
    }

    /// The validated title.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem for this document. Identical to the title by the type
    /// invariant; kept as a named operation so the naming role stays
    /// distinct from the display role at call sites.
    pub fn file_stem(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strict title check: non-empty, every char an ASCII letter or digit.
pub fn is_strict(title: &str) -> bool {
    !title.is_empty() && title.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Replace every run of characters outside `[A-Za-z0-9._-]` with a single
/// underscore.
///
/// Total and deterministic; empty input maps to empty output, which callers
/// must treat as invalid. This is a naming convenience, not a security
/// boundary: distinct unsafe titles can collide on the same safe name.
pub fn safe_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_run = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_accepts_alphanumeric() {
        assert!(is_strict("Intro"));
        assert!(is_strict("page2"));
        assert!(is_strict("X"));
        assert!(is_strict("0123456789abcXYZ"));
    }

    #[test]
    fn test_strict_rejects_everything_else() {
        assert!(!is_strict(""));
        assert!(!is_strict("bad title!"));
        assert!(!is_strict("with space"));
        assert!(!is_strict("dotted.name"));
        assert!(!is_strict("under_score"));
        assert!(!is_strict("../escape"));
        assert!(!is_strict("héllo"));
        assert!(!is_strict("emoji🙂"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = DocumentId::parse("Intro").unwrap();
        assert_eq!(id.as_str(), "Intro");
        assert_eq!(id.file_stem(), "Intro");
        assert_eq!(id.to_string(), "Intro");
    }

    #[test]
    fn test_parse_rejects_without_side_effects() {
        assert!(matches!(
            DocumentId::parse("bad title!"),
            Err(WikiError::InvalidTitle(_))
        ));
        assert!(DocumentId::parse("").is_err());
    }

    #[test]
    fn test_safe_filename_charset() {
        for title in ["a b", "a/../b", "héllo wörld", "x!@#$%^&*()y", ""] {
            let safe = safe_filename(title);
            assert!(
                safe.bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-')),
                "unsafe byte in {safe:?}"
            );
        }
    }

    #[test]
    fn test_safe_filename_collapses_runs() {
        assert_eq!(safe_filename("a b"), "a_b");
        assert_eq!(safe_filename("a   b"), "a_b");
        assert_eq!(safe_filename("a/../b"), "a_.._b");
        assert_eq!(safe_filename("keep.these-chars_ok"), "keep.these-chars_ok");
    }

    #[test]
    fn test_safe_filename_total_and_deterministic() {
        assert_eq!(safe_filename(""), "");
        assert_eq!(safe_filename("héllo"), safe_filename("héllo"));
    }

    #[test]
    fn test_distinct_titles_can_collide() {
        assert_eq!(safe_filename("a b"), safe_filename("a!b"));
    }
}
