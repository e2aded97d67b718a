//! Detector facade: rule database, matcher and cache behind `lookup`.

use crate::cache::{CacheStats, DetectionCache};
use crate::config::DetectorConfig;
use crate::detection::Detection;
use crate::error::Result;
use crate::matchers::{Classification, Matcher};
use crate::rules::RuleDatabase;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User-Agent classifier.
///
/// Construction loads the rule database and allocates the cache; the
/// detector is then ready and can be shared between threads (wrap it in an
/// [`Arc`]). [`Detector::close`] consumes it, so a closed detector cannot
/// be used.
pub struct Detector {
    /// Classification pipeline
    matcher: Matcher,
    /// Completed detections keyed by the raw User-Agent
    cache: DetectionCache<String, Arc<Detection>>,
    /// Longest User-Agent that is classified
    max_user_agent_length: usize,
    /// Shared result for input that is not classified
    empty: Arc<Detection>,
}

impl Detector {
    /// Create a detector over the embedded rule corpus.
    pub fn new(cache_size: u64) -> Result<Self> {
        Self::with_config(&DetectorConfig::with_cache_size(cache_size))
    }

    /// Create a detector from configuration.
    pub fn with_config(config: &DetectorConfig) -> Result<Self> {
        let rules = RuleDatabase::load(&config.rules.source())?;
        Ok(Self::with_rules(Arc::new(rules), config))
    }

    /// Create a detector sharing an already loaded rule database.
    pub fn with_rules(rules: Arc<RuleDatabase>, config: &DetectorConfig) -> Self {
        info!(
            cache_size = config.cache.size,
            max_user_agent_length = config.limits.max_user_agent_length,
            "Device detector ready"
        );

        Self {
            matcher: Matcher::new(rules),
            cache: DetectionCache::new("detections", config.cache.size),
            max_user_agent_length: config.limits.max_user_agent_length,
            empty: Arc::new(Detection::empty()),
        }
    }

    /// Classify a User-Agent, consulting the cache first.
    ///
    /// Never fails: unmatched groups are absent sub-results. Input longer
    /// than the configured limit yields the empty detection and is not
    /// cached.
    pub fn lookup(&self, ua: &str) -> Arc<Detection> {
        if ua.len() > self.max_user_agent_length {
            warn!(
                length = ua.len(),
                limit = self.max_user_agent_length,
                "User-Agent exceeds length limit, skipping classification"
            );
            return Arc::clone(&self.empty);
        }

        self.cache
            .get_or_compute(ua, || Arc::new(self.classify(ua)))
    }

    /// Classify raw header bytes; input that is not UTF-8 yields the empty
    /// detection.
    pub fn lookup_bytes(&self, ua: &[u8]) -> Arc<Detection> {
        match std::str::from_utf8(ua) {
            Ok(ua) => self.lookup(ua),
            Err(e) => {
                debug!(error = %e, "User-Agent is not valid UTF-8");
                Arc::clone(&self.empty)
            }
        }
    }

    /// Classify without touching the cache.
    pub fn classify(&self, ua: &str) -> Detection {
        let classification: Classification = self.matcher.classify(ua);
        let detection = Detection::from(classification);
        debug!(
            bot = detection.is_bot(),
            client = detection.client().map(|c| c.name.as_str()),
            "Classified user agent"
        );
        detection
    }

    /// The rule database in use.
    pub fn rules(&self) -> &RuleDatabase {
        self.matcher.rules()
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Release the cache and rule database.
    pub fn close(self) {
        let stats = self.cache.stats();
        info!(
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            "Device detector closed"
        );
    }
}
