//! Canonical slug derivation and validation.
//!
//! The SDK and server must produce identical output for the same input, so
//! this algorithm is deliberately simple and documented step by step rather
//! than delegated to a general-purpose slugify crate whose behavior could
//! drift across versions.

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^$|^latest$|^[a-zA-Z0-9._-]+$|^[a-f0-9]{64}$").unwrap());

/// Derives a slug from a human-readable name:
/// 1. replace every run of non-alphanumeric characters with `-`
/// 2. lowercase
/// 3. collapse consecutive `-`
/// 4. trim leading/trailing `-`
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && SLUG_RE.is_match(slug)
}

pub fn is_valid_reference_version(version: &str) -> bool {
    VERSION_RE.is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_slugification() {
        assert_eq!(slugify("Code Analysis"), "code-analysis");
        assert_eq!(slugify("  Senior Reviewer!! "), "senior-reviewer");
        assert_eq!(slugify("a___b--c"), "a-b-c");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Code Analysis", "already-a-slug", "  messy__Input--", ""] {
            let once = slugify(input);
            let twice = slugify(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_name_yields_empty_slug() {
        assert_eq!(slugify(""), "");
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn reference_version_regex() {
        assert!(is_valid_reference_version(""));
        assert!(is_valid_reference_version("latest"));
        assert!(is_valid_reference_version("stable"));
        assert!(is_valid_reference_version(&"a".repeat(64).replace('a', "f")));
        assert!(is_valid_reference_version(&"0".repeat(64)));
    }
}
