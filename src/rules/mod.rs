//! Rule database.
//!
//! The rule corpus is a set of YAML files, embedded into the binary at
//! compile time or read from a directory with the same layout. Loading
//! compiles every pattern once; afterwards the database is immutable and
//! shared between lookups without locking. Rule order inside each file is
//! significant: the first matching rule wins.

mod bots;
mod clients;
mod devices;
pub mod known_browsers;
pub mod known_oss;
mod oss;
pub(crate) mod pattern;

pub(crate) use bots::BotRule;
pub(crate) use clients::{ClientGroup, ClientRule, EngineRule, EngineVersions};
pub(crate) use devices::{BrandRule, DeviceGroup, VendorFragment};
pub(crate) use oss::OsRule;

use crate::detection::{ClientType, DeviceType};
use crate::error::{DetectorError, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, info};

const BOTS_FILE: &str = "bots.yml";
const ENGINES_FILE: &str = "client/browser_engine.yml";
const OSS_FILE: &str = "oss.yml";
const VENDOR_FRAGMENTS_FILE: &str = "vendor_fragments.yml";

/// Client rule files in lookup order.
const CLIENT_FILES: &[(&str, ClientType)] = &[
    ("client/feed_readers.yml", ClientType::FeedReader),
    ("client/mobile_apps.yml", ClientType::MobileApp),
    ("client/media_players.yml", ClientType::MediaPlayer),
    ("client/pim.yml", ClientType::Pim),
    ("client/browsers.yml", ClientType::Browser),
    ("client/libraries.yml", ClientType::Library),
];

/// Device rule files in lookup order, with their gate pattern and forced type.
const DEVICE_FILES: &[(&str, Option<&str>, Option<DeviceType>)] = &[
    (
        "device/televisions.yml",
        Some(r"HbbTV/([1-9](?:\.[0-9]){1,2})"),
        Some(DeviceType::Television),
    ),
    (
        "device/shell_tv.yml",
        Some(r"[a-z]+[ _]Shell[ _]\w{6}|tclwebkit(\d+[.\d]*)"),
        Some(DeviceType::Television),
    ),
    ("device/notebooks.yml", Some("FBMD/"), None),
    ("device/consoles.yml", None, None),
    ("device/car_browsers.yml", None, None),
    ("device/cameras.yml", None, None),
    ("device/portable_media_players.yml", None, None),
    ("device/mobiles.yml", None, None),
];

/// The corpus compiled into the binary.
static EMBEDDED: &[(&str, &str)] = &[
    (BOTS_FILE, include_str!("../../data/regexes/bots.yml")),
    (
        "client/feed_readers.yml",
        include_str!("../../data/regexes/client/feed_readers.yml"),
    ),
    (
        "client/mobile_apps.yml",
        include_str!("../../data/regexes/client/mobile_apps.yml"),
    ),
    (
        "client/media_players.yml",
        include_str!("../../data/regexes/client/media_players.yml"),
    ),
    ("client/pim.yml", include_str!("../../data/regexes/client/pim.yml")),
    (
        "client/browsers.yml",
        include_str!("../../data/regexes/client/browsers.yml"),
    ),
    (
        "client/libraries.yml",
        include_str!("../../data/regexes/client/libraries.yml"),
    ),
    (
        ENGINES_FILE,
        include_str!("../../data/regexes/client/browser_engine.yml"),
    ),
    (OSS_FILE, include_str!("../../data/regexes/oss.yml")),
    (
        "device/televisions.yml",
        include_str!("../../data/regexes/device/televisions.yml"),
    ),
    (
        "device/shell_tv.yml",
        include_str!("../../data/regexes/device/shell_tv.yml"),
    ),
    (
        "device/notebooks.yml",
        include_str!("../../data/regexes/device/notebooks.yml"),
    ),
    (
        "device/consoles.yml",
        include_str!("../../data/regexes/device/consoles.yml"),
    ),
    (
        "device/car_browsers.yml",
        include_str!("../../data/regexes/device/car_browsers.yml"),
    ),
    (
        "device/cameras.yml",
        include_str!("../../data/regexes/device/cameras.yml"),
    ),
    (
        "device/portable_media_players.yml",
        include_str!("../../data/regexes/device/portable_media_players.yml"),
    ),
    (
        "device/mobiles.yml",
        include_str!("../../data/regexes/device/mobiles.yml"),
    ),
    (
        VENDOR_FRAGMENTS_FILE,
        include_str!("../../data/regexes/vendor_fragments.yml"),
    ),
];

/// A rule with a User-Agent pattern.
pub(crate) trait Rule {
    fn pattern(&self) -> &Regex;
}

/// Return the first rule in `rules` whose pattern matches `ua`.
pub(crate) fn first_match<'r, 'u, R: Rule>(
    rules: &'r [R],
    ua: &'u str,
) -> Option<(&'r R, Captures<'u>)> {
    rules
        .iter()
        .find_map(|rule| rule.pattern().captures(ua).map(|caps| (rule, caps)))
}

/// Where the rule corpus is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorpusSource {
    /// The corpus compiled into the binary.
    #[default]
    Embedded,
    /// A directory laid out like `data/regexes`.
    Directory(PathBuf),
}

impl CorpusSource {
    fn read(&self, file: &'static str) -> Result<Cow<'static, str>> {
        match self {
            CorpusSource::Embedded => EMBEDDED
                .iter()
                .find(|(name, _)| *name == file)
                .map(|(_, content)| Cow::Borrowed(*content))
                .ok_or_else(|| DetectorError::Io {
                    path: file.to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            CorpusSource::Directory(dir) => {
                let path = dir.join(file);
                debug!(path = %path.display(), "Reading rule file");
                std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| DetectorError::Io {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }
}

/// Number of rules per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCounts {
    pub bots: usize,
    pub clients: usize,
    pub engines: usize,
    pub oss: usize,
    pub devices: usize,
    pub vendor_fragments: usize,
}

/// The immutable, compiled rule corpus.
#[derive(Debug)]
pub struct RuleDatabase {
    pub(crate) bots: Vec<BotRule>,
    pub(crate) clients: Vec<ClientGroup>,
    pub(crate) engines: Vec<EngineRule>,
    pub(crate) engine_versions: EngineVersions,
    pub(crate) oss: Vec<OsRule>,
    pub(crate) devices: Vec<DeviceGroup>,
    pub(crate) vendor_fragments: Vec<VendorFragment>,
}

impl RuleDatabase {
    /// Load the corpus compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::load(&CorpusSource::Embedded)
    }

    /// Load and compile the corpus from `source`.
    pub fn load(source: &CorpusSource) -> Result<Self> {
        let bots = bots::load(BOTS_FILE, &source.read(BOTS_FILE)?)?;

        let clients = CLIENT_FILES
            .iter()
            .map(|&(file, client_type)| clients::load(file, client_type, &source.read(file)?))
            .collect::<Result<Vec<_>>>()?;

        let engines = clients::load_engines(ENGINES_FILE, &source.read(ENGINES_FILE)?)?;

        let engine_names = engines
            .iter()
            .map(|engine| engine.name.as_str())
            .chain(
                clients
                    .iter()
                    .flat_map(|group| &group.rules)
                    .filter_map(|rule| rule.engine.as_ref())
                    .flat_map(|spec| {
                        spec.default
                            .iter()
                            .chain(spec.versions.iter().map(|(_, engine)| engine))
                            .map(String::as_str)
                    }),
            );
        let engine_versions = EngineVersions::compile(engine_names)?;

        let oss = oss::load(OSS_FILE, &source.read(OSS_FILE)?)?;

        let devices = DEVICE_FILES
            .iter()
            .map(|&(file, gate, forced_type)| {
                devices::load(file, gate, forced_type, &source.read(file)?)
            })
            .collect::<Result<Vec<_>>>()?;

        let vendor_fragments =
            devices::load_vendor_fragments(VENDOR_FRAGMENTS_FILE, &source.read(VENDOR_FRAGMENTS_FILE)?)?;

        let database = Self {
            bots,
            clients,
            engines,
            engine_versions,
            oss,
            devices,
            vendor_fragments,
        };

        let counts = database.counts();
        info!(
            bots = counts.bots,
            clients = counts.clients,
            engines = counts.engines,
            oss = counts.oss,
            devices = counts.devices,
            vendor_fragments = counts.vendor_fragments,
            "Rule database loaded"
        );

        Ok(database)
    }

    /// Rule counts per group.
    pub fn counts(&self) -> RuleCounts {
        RuleCounts {
            bots: self.bots.len(),
            clients: self.clients.iter().map(|g| g.rules.len()).sum(),
            engines: self.engines.len(),
            oss: self.oss.len(),
            devices: self.devices.iter().map(|g| g.brands.len()).sum(),
            vendor_fragments: self.vendor_fragments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_corpus_loads() {
        let db = RuleDatabase::embedded().unwrap();
        let counts = db.counts();
        assert!(counts.bots > 40);
        assert!(counts.clients > 50);
        assert!(counts.engines > 5);
        assert!(counts.oss > 30);
        assert!(counts.devices > 20);
        assert!(counts.vendor_fragments > 0);
    }

    #[test]
    fn test_client_groups_in_lookup_order() {
        let db = RuleDatabase::embedded().unwrap();
        let order: Vec<_> = db.clients.iter().map(|g| g.client_type).collect();
        assert_eq!(
            order,
            [
                ClientType::FeedReader,
                ClientType::MobileApp,
                ClientType::MediaPlayer,
                ClientType::Pim,
                ClientType::Browser,
                ClientType::Library,
            ]
        );
    }

    #[test]
    fn test_device_groups_gated_first() {
        let db = RuleDatabase::embedded().unwrap();
        assert_eq!(db.devices[0].name, "device/televisions.yml");
        assert_eq!(db.devices[1].name, "device/shell_tv.yml");
        assert!(db.devices[..3].iter().all(|group| group.gate.is_some()));
        assert_eq!(db.devices[1].forced_type, Some(DeviceType::Television));
        assert_eq!(db.devices.last().unwrap().name, "device/mobiles.yml");
    }

    #[test]
    fn test_every_engine_has_version_pattern() {
        let db = RuleDatabase::embedded().unwrap();
        let ua = "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
        assert_eq!(
            db.engine_versions.version("Blink", ua).as_deref(),
            Some("120.0.0.0")
        );
    }

    #[test]
    fn test_missing_directory() {
        let source = CorpusSource::Directory(PathBuf::from("/nonexistent/zentinel/regexes"));
        let err = RuleDatabase::load(&source).unwrap_err();
        assert!(matches!(err, DetectorError::Io { .. }));
    }

    #[test]
    fn test_directory_matches_embedded() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/regexes");
        let from_dir = RuleDatabase::load(&CorpusSource::Directory(dir)).unwrap();
        assert_eq!(from_dir.counts(), RuleDatabase::embedded().unwrap().counts());
    }
}
