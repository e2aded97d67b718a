//! Operating system rules (`oss.yml`).

use super::{pattern, Rule};
use crate::error::{DetectorError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OsEntry {
    regex: String,
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    versions: Vec<OsVersionEntry>,
}

#[derive(Debug, Deserialize)]
struct OsVersionEntry {
    #[serde(default)]
    regex: Option<String>,
    version: String,
}

/// Version sub-rule. Without a pattern it always applies and expands
/// against the captures of the parent rule.
#[derive(Debug)]
pub(crate) struct OsVersionRule {
    pattern: Option<Regex>,
    version: String,
}

/// A compiled operating system rule.
#[derive(Debug)]
pub(crate) struct OsRule {
    pattern: Regex,
    pub(crate) name: String,
    version: Option<String>,
    versions: Vec<OsVersionRule>,
}

impl Rule for OsRule {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl OsRule {
    /// Resolve the raw version string for a match of this rule.
    ///
    /// The first matching version sub-rule wins; the rule's own template
    /// is the fallback.
    pub(crate) fn version(&self, ua: &str, caps: &Captures<'_>) -> Option<String> {
        self.versions
            .iter()
            .find_map(|rule| match &rule.pattern {
                Some(re) => re
                    .captures(ua)
                    .map(|sub| pattern::expand(&rule.version, &sub)),
                None => Some(pattern::expand(&rule.version, caps)),
            })
            .or_else(|| {
                self.version
                    .as_ref()
                    .map(|template| pattern::expand(template, caps))
            })
    }
}

fn compile_rule(file: &'static str, entry: OsEntry) -> Result<OsRule> {
    let versions = entry
        .versions
        .into_iter()
        .map(|v| {
            Ok(OsVersionRule {
                pattern: v
                    .regex
                    .as_deref()
                    .map(|re| pattern::compile(file, re))
                    .transpose()?,
                version: v.version,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(OsRule {
        pattern: pattern::compile(file, &entry.regex)?,
        name: entry.name,
        version: entry.version,
        versions,
    })
}

/// Parse and compile `oss.yml`.
pub(crate) fn load(file: &'static str, yaml: &str) -> Result<Vec<OsRule>> {
    let entries: Vec<OsEntry> =
        serde_yaml::from_str(yaml).map_err(|source| DetectorError::Rules { file, source })?;
    entries
        .into_iter()
        .map(|entry| compile_rule(file, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
- regex: 'Windows NT|Win64'
  name: 'Windows'
  versions:
    - regex: 'Windows NT 10\.0'
      version: '10'
    - regex: 'Windows NT 6\.1'
      version: '7'
- regex: 'Android(?: (\d+[.\d]*))?'
  name: 'Android'
  version: '$1'
"#;

    #[test]
    fn test_version_sub_rules() {
        let rules = load("oss.yml", YAML).unwrap();
        let ua = "Mozilla/5.0 (Windows NT 6.1; Win64; x64)";
        let caps = rules[0].pattern().captures(ua).unwrap();
        assert_eq!(rules[0].version(ua, &caps).as_deref(), Some("7"));

        let ua = "Mozilla/5.0 (Windows NT 5.1)";
        let caps = rules[0].pattern().captures(ua).unwrap();
        assert_eq!(rules[0].version(ua, &caps), None);
    }

    #[test]
    fn test_version_template() {
        let rules = load("oss.yml", YAML).unwrap();
        let ua = "Mozilla/5.0 (Linux; Android 13; Pixel 7)";
        let caps = rules[1].pattern().captures(ua).unwrap();
        assert_eq!(rules[1].version(ua, &caps).as_deref(), Some("13"));
    }
}
