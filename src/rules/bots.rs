//! Bot rules (`bots.yml`).

use super::{pattern, Rule};
use crate::detection::Bot;
use crate::error::{DetectorError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BotEntry {
    regex: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    producer: Option<BotProducer>,
}

#[derive(Debug, Deserialize)]
struct BotProducer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// A compiled bot rule.
#[derive(Debug)]
pub(crate) struct BotRule {
    pattern: Regex,
    name: String,
    category: Option<String>,
    url: Option<String>,
    producer_name: Option<String>,
    producer_url: Option<String>,
}

impl Rule for BotRule {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl BotRule {
    fn compile(entry: BotEntry) -> Result<Self> {
        let (producer_name, producer_url) = match entry.producer {
            Some(producer) => (non_empty(producer.name), non_empty(producer.url)),
            None => (None, None),
        };

        Ok(Self {
            pattern: pattern::compile("bots", &entry.regex)?,
            name: entry.name,
            category: non_empty(entry.category),
            url: non_empty(entry.url),
            producer_name,
            producer_url,
        })
    }

    /// Build the bot sub-result for a match of this rule.
    pub(crate) fn to_bot(&self, caps: &Captures<'_>) -> Bot {
        let name = pattern::expand_name(&self.name, caps);
        Bot {
            name: (!name.is_empty()).then_some(name),
            category: self.category.clone(),
            url: self.url.clone(),
            producer_name: self.producer_name.clone(),
            producer_url: self.producer_url.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse and compile `bots.yml`.
pub(crate) fn load(file: &'static str, yaml: &str) -> Result<Vec<BotRule>> {
    let entries: Vec<BotEntry> =
        serde_yaml::from_str(yaml).map_err(|source| DetectorError::Rules { file, source })?;
    entries.into_iter().map(BotRule::compile).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
- regex: 'Googlebot'
  name: 'Googlebot'
  category: 'Search bot'
  url: 'https://developers.google.com/search/docs/crawling-indexing/googlebot'
  producer:
    name: 'Google Inc.'
    url: 'https://www.google.com'
- regex: '([a-z]+)bot'
  name: 'Generic $1'
  producer:
    name: ''
    url: ''
"#;

    #[test]
    fn test_load_preserves_order() {
        let rules = load("bots.yml", YAML).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "Googlebot");
        assert_eq!(rules[0].producer_name.as_deref(), Some("Google Inc."));
    }

    #[test]
    fn test_empty_producer_is_absent() {
        let rules = load("bots.yml", YAML).unwrap();
        assert!(rules[1].producer_name.is_none());
        assert!(rules[1].producer_url.is_none());
        assert!(rules[1].category.is_none());
    }

    #[test]
    fn test_name_template() {
        let rules = load("bots.yml", YAML).unwrap();
        let caps = rules[1].pattern.captures("Mozilla/5.0 (compatible; foobot/1.0)").unwrap();
        assert_eq!(rules[1].to_bot(&caps).name.as_deref(), Some("Generic foo"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = load("bots.yml", "- regex: [unclosed").unwrap_err();
        assert!(matches!(err, DetectorError::Rules { file: "bots.yml", .. }));
    }
}
