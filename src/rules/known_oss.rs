//! Operating system families.

/// A canonical operating system name and the family it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownOs {
    pub name: &'static str,
    pub family: &'static str,
}

/// Families whose devices default to "desktop".
const DESKTOP_FAMILIES: &[&str] = &[
    "AmigaOS",
    "IBM",
    "GNU/Linux",
    "Mac",
    "Unix",
    "Windows",
    "BeOS",
    "Chrome OS",
];

/// Operating systems whose hardware is made by Apple.
const APPLE_OSS: &[&str] = &["iPadOS", "tvOS", "watchOS", "iOS", "Mac"];

static KNOWN_OSS: &[KnownOs] = &[
    KnownOs { name: "Windows Phone", family: "Windows Mobile" },
    KnownOs { name: "Windows Mobile", family: "Windows Mobile" },
    KnownOs { name: "Windows CE", family: "Windows Mobile" },
    KnownOs { name: "Windows RT", family: "Windows Mobile" },
    KnownOs { name: "Xbox", family: "Mobile Gaming Console" },
    KnownOs { name: "PlayStation Portable", family: "Mobile Gaming Console" },
    KnownOs { name: "PlayStation", family: "Gaming Console" },
    KnownOs { name: "Nintendo", family: "Gaming Console" },
    KnownOs { name: "Nintendo Mobile", family: "Mobile Gaming Console" },
    KnownOs { name: "HarmonyOS", family: "Android" },
    KnownOs { name: "Android", family: "Android" },
    KnownOs { name: "Android TV", family: "Android" },
    KnownOs { name: "Fire OS", family: "Android" },
    KnownOs { name: "Wear OS", family: "Android" },
    KnownOs { name: "Tizen", family: "Other Mobile" },
    KnownOs { name: "webOS", family: "Other Mobile" },
    KnownOs { name: "KaiOS", family: "Firefox OS" },
    KnownOs { name: "Firefox OS", family: "Firefox OS" },
    KnownOs { name: "Chrome OS", family: "Chrome OS" },
    KnownOs { name: "iPadOS", family: "iOS" },
    KnownOs { name: "tvOS", family: "iOS" },
    KnownOs { name: "watchOS", family: "iOS" },
    KnownOs { name: "iOS", family: "iOS" },
    KnownOs { name: "Mac", family: "Mac" },
    KnownOs { name: "Ubuntu", family: "GNU/Linux" },
    KnownOs { name: "Fedora", family: "GNU/Linux" },
    KnownOs { name: "Debian", family: "GNU/Linux" },
    KnownOs { name: "GNU/Linux", family: "GNU/Linux" },
    KnownOs { name: "Sailfish OS", family: "GNU/Linux" },
    KnownOs { name: "Fuchsia", family: "GNU/Linux" },
    KnownOs { name: "FreeBSD", family: "Unix" },
    KnownOs { name: "OpenBSD", family: "Unix" },
    KnownOs { name: "NetBSD", family: "Unix" },
    KnownOs { name: "Solaris", family: "Unix" },
    KnownOs { name: "Windows", family: "Windows" },
    KnownOs { name: "BlackBerry OS", family: "BlackBerry" },
    KnownOs { name: "BlackBerry Tablet OS", family: "BlackBerry" },
    KnownOs { name: "Symbian OS", family: "Symbian" },
    KnownOs { name: "Symbian", family: "Symbian" },
    KnownOs { name: "Java ME", family: "Real-time OS" },
    KnownOs { name: "Haiku OS", family: "BeOS" },
    KnownOs { name: "AmigaOS", family: "AmigaOS" },
    KnownOs { name: "OS/2", family: "IBM" },
];

/// Look up an operating system by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static KnownOs> {
    KNOWN_OSS
        .iter()
        .find(|os| os.name.eq_ignore_ascii_case(name))
}

/// Whether devices running this family are desktops by default.
pub fn is_desktop_family(family: &str) -> bool {
    DESKTOP_FAMILIES.contains(&family)
}

/// Whether this operating system only runs on Apple hardware.
pub fn is_apple_os(name: &str) -> bool {
    APPLE_OSS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_canonicalises_case() {
        let os = lookup("IOS").unwrap();
        assert_eq!(os.name, "iOS");
        assert_eq!(os.family, "iOS");
        assert_eq!(lookup("iPadOS").unwrap().family, "iOS");
        assert!(lookup("TempleOS").is_none());
    }

    #[test]
    fn test_desktop_families() {
        assert!(is_desktop_family("Windows"));
        assert!(is_desktop_family("GNU/Linux"));
        assert!(!is_desktop_family("Android"));
        assert!(!is_desktop_family("Windows Mobile"));
    }

    #[test]
    fn test_apple_oss() {
        assert!(is_apple_os("watchOS"));
        assert!(!is_apple_os("Android"));
    }
}
