//! Bot matching.

use crate::detection::Bot;
use crate::rules::{first_match, RuleDatabase};
use tracing::trace;

/// Match the User-Agent against the bot rules; the first match wins.
pub fn detect(rules: &RuleDatabase, ua: &str) -> Option<Bot> {
    let (rule, caps) = first_match(&rules.bots, ua)?;
    let bot = rule.to_bot(&caps);
    trace!(name = bot.name.as_deref(), "Bot rule matched");
    Some(bot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleDatabase {
        RuleDatabase::embedded().unwrap()
    }

    #[test]
    fn test_googlebot() {
        let bot = detect(&rules(), "googlebot").unwrap();
        assert_eq!(bot.name.as_deref(), Some("Googlebot"));
        assert_eq!(bot.category.as_deref(), Some("Search bot"));
        assert_eq!(bot.producer_name.as_deref(), Some("Google Inc."));
    }

    #[test]
    fn test_security_scanner() {
        let bot = detect(&rules(), "sqlmap/1.7.2#stable (https://sqlmap.org)").unwrap();
        assert_eq!(bot.name.as_deref(), Some("sqlmap"));
        assert_eq!(bot.category.as_deref(), Some("Security Checker"));
    }

    #[test]
    fn test_generic_bot_fallback() {
        let bot = detect(&rules(), "Mozilla/5.0 (compatible; AcmeCrawler/2.1)").unwrap();
        assert_eq!(bot.name.as_deref(), Some("Generic Bot"));
    }

    #[test]
    fn test_browser_is_not_bot() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
        assert!(detect(&rules(), ua).is_none());
    }
}
