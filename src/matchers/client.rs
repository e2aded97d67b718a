//! Client matching: feed readers, mobile apps, media players, PIM,
//! browsers and libraries, in that order.

use super::compare_versions;
use crate::detection::{Client, ClientType};
use crate::rules::pattern::{clean_version, expand, expand_name};
use crate::rules::{first_match, known_browsers, ClientRule, RuleDatabase};
use std::cmp::Ordering;
use tracing::trace;

/// Match the User-Agent against the client rule groups.
pub fn detect(rules: &RuleDatabase, ua: &str) -> Option<Client> {
    rules.clients.iter().find_map(|group| {
        let (rule, caps) = first_match(&group.rules, ua)?;

        let name = expand_name(&rule.name, &caps);
        let version = rule
            .version
            .as_ref()
            .and_then(|template| clean_version(&expand(template, &caps)));

        let (engine, engine_version, family) = if group.client_type == ClientType::Browser {
            let engine = browser_engine(rules, rule, ua, version.as_deref());
            let engine_version = engine
                .as_deref()
                .and_then(|engine| rules.engine_versions.version(engine, ua));
            let family = known_browsers::lookup(&name).map(|b| b.family.to_string());
            (engine, engine_version, family)
        } else {
            (None, None, None)
        };

        trace!(name = %name, client_type = %group.client_type, "Client rule matched");

        Some(Client {
            name,
            client_type: group.client_type,
            version,
            engine,
            engine_version,
            family,
        })
    })
}

/// Resolve the rendering engine for a browser match.
///
/// A version-keyed engine from the rule wins (highest minimum version not
/// above the browser version), then the rule default, then the first
/// match in the engine table.
fn browser_engine(
    rules: &RuleDatabase,
    rule: &ClientRule,
    ua: &str,
    version: Option<&str>,
) -> Option<String> {
    if let Some(spec) = &rule.engine {
        if let Some(version) = version {
            let mut best: Option<&(String, String)> = None;
            for entry in &spec.versions {
                let applies = compare_versions(version, &entry.0)
                    .is_some_and(|ord| ord != Ordering::Less);
                let higher = best.map_or(true, |current| {
                    compare_versions(&entry.0, &current.0) == Some(Ordering::Greater)
                });
                if applies && higher {
                    best = Some(entry);
                }
            }
            if let Some((_, engine)) = best {
                return Some(engine.clone());
            }
        }

        if let Some(default) = &spec.default {
            return Some(default.clone());
        }
    }

    first_match(&rules.engines, ua).map(|(engine, _)| engine.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleDatabase {
        RuleDatabase::embedded().unwrap()
    }

    #[test]
    fn test_chrome_mobile_blink() {
        let ua = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Mobile Safari/537.36";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Chrome Mobile");
        assert_eq!(client.client_type, ClientType::Browser);
        assert_eq!(client.version.as_deref(), Some("116.0.0.0"));
        assert_eq!(client.engine.as_deref(), Some("Blink"));
        assert_eq!(client.engine_version.as_deref(), Some("116.0.0.0"));
        assert_eq!(client.family.as_deref(), Some("Chrome"));
    }

    #[test]
    fn test_old_chrome_uses_default_engine() {
        let ua = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/535.19 (KHTML, like Gecko) Chrome/18.0.1025.168 Safari/535.19";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Chrome");
        assert_eq!(client.engine.as_deref(), Some("WebKit"));
        assert_eq!(client.engine_version.as_deref(), Some("535.19"));
    }

    #[test]
    fn test_edge_before_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Microsoft Edge");
        assert_eq!(client.version.as_deref(), Some("120.0.2210.91"));
        assert_eq!(client.engine.as_deref(), Some("Blink"));
    }

    #[test]
    fn test_firefox_gecko() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Firefox");
        assert_eq!(client.engine.as_deref(), Some("Gecko"));
        assert_eq!(client.engine_version.as_deref(), Some("121.0"));
    }

    #[test]
    fn test_feed_reader_before_browser() {
        let ua = "Liferea/1.12.9 (Linux; en_US.UTF-8; http://liferea.sf.net/)";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Liferea");
        assert_eq!(client.client_type, ClientType::FeedReader);
        assert!(client.engine.is_none());
    }

    #[test]
    fn test_pim() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:102.0) Gecko/20100101 Thunderbird/102.10.0";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Thunderbird");
        assert_eq!(client.client_type, ClientType::Pim);
        assert_eq!(client.version.as_deref(), Some("102.10.0"));
    }

    #[test]
    fn test_library() {
        let client = detect(&rules(), "curl/7.68.0").unwrap();
        assert_eq!(client.name, "curl");
        assert_eq!(client.client_type, ClientType::Library);
        assert_eq!(client.version.as_deref(), Some("7.68.0"));
    }

    #[test]
    fn test_engine_table_fallback() {
        let ua = "Lynx/2.8.9rel.1 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/3.6.13";
        let client = detect(&rules(), ua).unwrap();
        assert_eq!(client.name, "Lynx");
        assert_eq!(client.engine.as_deref(), Some("Text-based"));
    }
}
