//! Pattern compilation and capture-template expansion.
//!
//! Every corpus pattern is anchored on a User-Agent token boundary so that
//! `Nexus` matches `; Nexus 5X` but not `MyNexusApp`. Patterns are compiled
//! with the linear-time `regex` engine, so no rule can backtrack
//! catastrophically.

use crate::error::{DetectorError, Result};
use regex::{Captures, Regex, RegexBuilder};

/// Token boundary prepended to every User-Agent pattern.
const UA_BOUNDARY: &str = r"(?:^|[^A-Z0-9\-_]|[^A-Z0-9\-]_|sprd-|MZ-)";

/// Build a case-insensitive User-Agent pattern with the token boundary.
pub(crate) fn build(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("{UA_BOUNDARY}(?:{pattern})"))
        .case_insensitive(true)
        .build()
}

/// Compile a corpus pattern, attributing failures to its rule group.
pub(crate) fn compile(group: &'static str, pattern: &str) -> Result<Regex> {
    build(pattern).map_err(|source| DetectorError::Pattern {
        group,
        pattern: pattern.to_string(),
        source,
    })
}

/// Compile a case-insensitive pattern without the token boundary.
pub(crate) fn compile_bare(group: &'static str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| DetectorError::Pattern {
            group,
            pattern: pattern.to_string(),
            source,
        })
}

/// Replace `$1`..`$9` in `template` with the matching capture group.
///
/// Groups that did not participate in the match expand to nothing.
pub(crate) fn expand(template: &str, caps: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if let Some(group) = chars.peek().and_then(|d| d.to_digit(10)) {
                chars.next();
                if let Some(m) = caps.get(group as usize) {
                    out.push_str(m.as_str());
                }
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Normalise an extracted version: trailing dots and spaces are dropped and
/// an empty result means "no version".
pub(crate) fn clean_version(raw: &str) -> Option<String> {
    let version = raw.trim_start().trim_end_matches(|c: char| c == '.' || c == ' ');
    (!version.is_empty()).then(|| version.to_string())
}

/// Normalise an operating system version (`10_15_7` becomes `10.15.7`).
pub(crate) fn clean_os_version(raw: &str) -> Option<String> {
    let version = raw.replace('_', ".");
    let version = version.trim_matches(|c: char| c == '.' || c == ' ');
    (!version.is_empty()).then(|| version.to_string())
}

/// Expand a name template and trim the result.
pub(crate) fn expand_name(template: &str, caps: &Captures<'_>) -> String {
    expand(template, caps).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_rejects_embedded_token() {
        let re = build("Nexus").unwrap();
        assert!(re.is_match("Linux; Android 8; Nexus 5X"));
        assert!(re.is_match("nexus"));
        assert!(!re.is_match("MyNexusApp"));
    }

    #[test]
    fn test_boundary_allows_vendor_prefixes() {
        let re = build("Spreadtrum").unwrap();
        assert!(re.is_match("sprd-Spreadtrum/1.0"));
    }

    #[test]
    fn test_expand_single_digit_groups() {
        let re = Regex::new(r"Chrome/(\d+)\.(\d+)").unwrap();
        let caps = re.captures("Chrome/116.0").unwrap();
        assert_eq!(expand("$1.$2", &caps), "116.0");
        assert_eq!(expand("v$1abc", &caps), "v116abc");
        assert_eq!(expand("$3", &caps), "");
        assert_eq!(expand("$", &caps), "$");
    }

    #[test]
    fn test_expand_missing_optional_group() {
        let re = Regex::new(r"CrMo(?:/(\d+))?|Chrome/(\d+) Mobile").unwrap();
        let caps = re.captures("Chrome/90 Mobile").unwrap();
        assert_eq!(expand("$1$2", &caps), "90");
    }

    #[test]
    fn test_clean_version() {
        assert_eq!(clean_version("13.0."), Some("13.0".to_string()));
        assert_eq!(clean_version(" 1.2 "), Some("1.2".to_string()));
        assert_eq!(clean_version(""), None);
        assert_eq!(clean_version(". "), None);
    }

    #[test]
    fn test_clean_os_version() {
        assert_eq!(clean_os_version("10_15_7"), Some("10.15.7".to_string()));
        assert_eq!(clean_os_version("_17_0"), Some("17.0".to_string()));
        assert_eq!(clean_os_version("_"), None);
    }

    #[test]
    fn test_compile_error_names_group() {
        let err = compile("bots", "(unclosed").unwrap_err();
        assert!(matches!(err, DetectorError::Pattern { group: "bots", .. }));
        assert!(!err.is_resource_exhaustion());
    }
}
