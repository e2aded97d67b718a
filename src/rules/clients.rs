//! Client rules (`client/*.yml`) and browser engine tables.

use super::{pattern, Rule};
use crate::detection::ClientType;
use crate::error::{DetectorError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct ClientEntry {
    regex: String,
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    engine: Option<EngineEntry>,
}

#[derive(Debug, Deserialize)]
struct EngineEntry {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    versions: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct EngineTableEntry {
    regex: String,
    name: String,
}

/// Engine hints attached to a browser rule.
#[derive(Debug, Default)]
pub(crate) struct EngineSpec {
    pub(crate) default: Option<String>,
    /// `(min_version, engine)` pairs in corpus order.
    pub(crate) versions: Vec<(String, String)>,
}

/// A compiled client rule.
#[derive(Debug)]
pub(crate) struct ClientRule {
    pattern: Regex,
    pub(crate) name: String,
    pub(crate) version: Option<String>,
    pub(crate) engine: Option<EngineSpec>,
}

impl Rule for ClientRule {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// All rules of one client type, in corpus order.
#[derive(Debug)]
pub(crate) struct ClientGroup {
    pub(crate) client_type: ClientType,
    pub(crate) rules: Vec<ClientRule>,
}

/// A compiled entry of the fallback engine table.
#[derive(Debug)]
pub(crate) struct EngineRule {
    pattern: Regex,
    pub(crate) name: String,
}

impl Rule for EngineRule {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Per-engine patterns that extract an engine version.
#[derive(Debug, Default)]
pub(crate) struct EngineVersions {
    patterns: HashMap<String, Vec<Regex>>,
}

impl EngineVersions {
    /// Precompile version extractors for every engine name in use.
    pub(crate) fn compile<'a>(engines: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut patterns = HashMap::new();

        for engine in engines {
            if engine.is_empty() || patterns.contains_key(engine) {
                continue;
            }

            let token = match engine {
                "Blink" => "(?:Chrome|Cronet)".to_string(),
                other => regex::escape(other),
            };

            let mut compiled = Vec::with_capacity(2);
            if matches!(engine, "Gecko" | "Clecko") {
                compiled.push(pattern::compile_bare(
                    "engine_version",
                    r"[ ](?:rv[: ]([0-9.]+)).*(?:g|cl)ecko/[0-9]{8,10}",
                )?);
            }
            compiled.push(pattern::compile_bare(
                "engine_version",
                &format!(r"{token}\s*/?\s*(\d+\.\d[.\d]*|\d{{1,7}})(?:\D|$)"),
            )?);

            patterns.insert(engine.to_string(), compiled);
        }

        Ok(Self { patterns })
    }

    /// Extract the version of `engine` from the User-Agent.
    pub(crate) fn version(&self, engine: &str, ua: &str) -> Option<String> {
        self.patterns
            .get(engine)?
            .iter()
            .find_map(|re| re.captures(ua))
            .and_then(|caps| caps.get(1))
            .and_then(|m| pattern::clean_version(m.as_str()))
    }
}

fn compile_rule(group: &'static str, entry: ClientEntry) -> Result<ClientRule> {
    let engine = entry.engine.map(|engine| EngineSpec {
        default: engine.default.filter(|d| !d.is_empty()),
        versions: engine.versions.into_iter().collect(),
    });

    Ok(ClientRule {
        pattern: pattern::compile(group, &entry.regex)?,
        name: entry.name,
        version: entry.version,
        engine,
    })
}

/// Parse and compile one client rule file.
pub(crate) fn load(
    file: &'static str,
    client_type: ClientType,
    yaml: &str,
) -> Result<ClientGroup> {
    let entries: Vec<ClientEntry> =
        serde_yaml::from_str(yaml).map_err(|source| DetectorError::Rules { file, source })?;
    let rules = entries
        .into_iter()
        .map(|entry| compile_rule(file, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(ClientGroup { client_type, rules })
}

/// Parse and compile `client/browser_engine.yml`.
pub(crate) fn load_engines(file: &'static str, yaml: &str) -> Result<Vec<EngineRule>> {
    let entries: Vec<EngineTableEntry> =
        serde_yaml::from_str(yaml).map_err(|source| DetectorError::Rules { file, source })?;
    entries
        .into_iter()
        .map(|entry| {
            Ok(EngineRule {
                pattern: pattern::compile(file, &entry.regex)?,
                name: entry.name,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_browser_engine_versions() {
        let yaml = r#"
- regex: 'Chrome(?:/(\d+[.\d]+))?'
  name: 'Chrome'
  version: '$1'
  engine:
    default: 'WebKit'
    versions:
      '28': 'Blink'
"#;
        let group = load("client/browsers.yml", ClientType::Browser, yaml).unwrap();
        let engine = group.rules[0].engine.as_ref().unwrap();
        assert_eq!(engine.default.as_deref(), Some("WebKit"));
        assert_eq!(engine.versions, vec![("28".to_string(), "Blink".to_string())]);
    }

    #[test]
    fn test_blink_version_uses_chrome_token() {
        let versions = EngineVersions::compile(["Blink", "WebKit"]).unwrap();
        let ua = "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";
        assert_eq!(versions.version("Blink", ua).as_deref(), Some("116.0.0.0"));
        assert_eq!(versions.version("WebKit", ua).as_deref(), Some("537.36"));
        assert_eq!(versions.version("Trident", ua), None);
    }

    #[test]
    fn test_gecko_prefers_rv_token() {
        let versions = EngineVersions::compile(["Gecko"]).unwrap();
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
        assert_eq!(versions.version("Gecko", ua).as_deref(), Some("121.0"));
    }

    #[test]
    fn test_load_engine_table() {
        let yaml = "- regex: 'Trident'\n  name: 'Trident'\n";
        let engines = load_engines("client/browser_engine.yml", yaml).unwrap();
        assert_eq!(engines[0].name, "Trident");
        assert!(engines[0].pattern().is_match("MSIE 9.0; Trident/5.0"));
    }
}
