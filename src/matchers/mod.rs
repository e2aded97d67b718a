//! Classification pipeline.
//!
//! Each sub-module matches one rule group against the User-Agent. The
//! [`Matcher`] runs them in a fixed order: bots, clients, operating
//! systems, then devices, since device refinement consumes the operating
//! system and client results.

pub mod bot;
pub mod client;
pub mod device;
pub mod os;

use crate::detection::{Bot, Client, Device, Os};
use crate::rules::RuleDatabase;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

/// The four sub-results of classifying one User-Agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub bot: Option<Bot>,
    pub client: Option<Client>,
    pub device: Option<Device>,
    pub os: Option<Os>,
}

/// Stateless classifier over a shared rule database.
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: Arc<RuleDatabase>,
}

impl Matcher {
    pub fn new(rules: Arc<RuleDatabase>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleDatabase {
        &self.rules
    }

    /// Classify a User-Agent. No match in a group leaves that sub-result
    /// absent; this never fails.
    pub fn classify(&self, ua: &str) -> Classification {
        if ua.is_empty() {
            return Classification::default();
        }

        let bot = bot::detect(&self.rules, ua);
        let client = client::detect(&self.rules, ua);
        let os = os::detect(&self.rules, ua);
        let device = device::detect(&self.rules, ua, os.as_ref(), client.as_ref());

        trace!(
            bot = bot.as_ref().and_then(|b| b.name.as_deref()),
            client = client.as_ref().map(|c| c.name.as_str()),
            os = os.as_ref().map(|o| o.name.as_str()),
            device = device
                .as_ref()
                .and_then(|d| d.device_type)
                .map(|t| t.as_str()),
            "Classified user agent"
        );

        Classification {
            bot,
            client,
            device,
            os,
        }
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect()
}

/// Compare dotted numeric versions, padding the shorter with zeros.
///
/// Returns `None` if either side has a non-numeric component.
pub(crate) fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    let len = a.len().max(b.len());

    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }

    Some(Ordering::Equal)
}
