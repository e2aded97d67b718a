//! Browser families and mobile-only browsers.

/// Static facts about a browser name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownBrowser {
    pub name: &'static str,
    pub family: &'static str,
    /// Ships only on phones and tablets.
    pub mobile_only: bool,
}

const fn browser(name: &'static str, family: &'static str, mobile_only: bool) -> KnownBrowser {
    KnownBrowser {
        name,
        family,
        mobile_only,
    }
}

static KNOWN_BROWSERS: &[KnownBrowser] = &[
    browser("Chrome", "Chrome", false),
    browser("Chrome Mobile", "Chrome", true),
    browser("Chrome Mobile iOS", "Chrome", true),
    browser("Chrome Webview", "Chrome", true),
    browser("Chromium", "Chrome", false),
    browser("Headless Chrome", "Chrome", false),
    browser("Microsoft Edge", "Chrome", false),
    browser("Opera", "Chrome", false),
    browser("Opera Mobile", "Chrome", true),
    browser("Opera Mini", "Opera", true),
    browser("Samsung Browser", "Chrome", true),
    browser("Yandex Browser", "Chrome", false),
    browser("Vivaldi", "Chrome", false),
    browser("Brave", "Chrome", false),
    browser("Whale Browser", "Chrome", false),
    browser("MIUI Browser", "Chrome", true),
    browser("Huawei Browser", "Chrome", true),
    browser("Amazon Silk", "Chrome", false),
    browser("DuckDuckGo Privacy Browser", "Chrome", true),
    browser("QQ Browser", "Chrome", false),
    browser("UC Browser", "Chrome", true),
    browser("Internet Explorer", "Internet Explorer", false),
    browser("Firefox", "Firefox", false),
    browser("Firefox Mobile", "Firefox", true),
    browser("Firefox iOS", "Firefox", true),
    browser("Safari", "Safari", false),
    browser("Mobile Safari", "Safari", true),
    browser("Kindle Browser", "Safari", true),
    browser("Android Browser", "Android Browser", true),
    browser("NetFront", "NetFront", false),
    browser("Lynx", "Text-based", false),
    browser("w3m", "Text-based", false),
];

/// Look up a browser by its exact name.
pub fn lookup(name: &str) -> Option<&'static KnownBrowser> {
    KNOWN_BROWSERS.iter().find(|b| b.name == name)
}

/// Whether the named browser ships only on phones and tablets.
pub fn is_mobile_only(name: &str) -> bool {
    lookup(name).is_some_and(|b| b.mobile_only)
}
