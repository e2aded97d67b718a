//! Operating system matching.

use crate::detection::Os;
use crate::rules::pattern::{self, clean_os_version, expand_name};
use crate::rules::{first_match, known_oss, RuleDatabase};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Architecture tokens, checked in order.
static PLATFORMS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("ARM", r"arm|aarch64|Apple ?TV|Watch ?OS|Watch1,[12]"),
        ("MIPS", r"mips"),
        ("SuperH", r"sh4"),
        ("x64", r"64-?bit|WOW64|(?:Intel)?x64|WINDOWS_64|win64|amd64|x86_?64"),
        ("x86", r".+32bit|.+win32|(?:i[0-9]|x)86|i86pc"),
    ]
    .into_iter()
    .map(|(name, re)| (name, pattern::build(re).expect("valid platform pattern")))
    .collect()
});

/// Match the User-Agent against the operating system rules.
pub fn detect(rules: &RuleDatabase, ua: &str) -> Option<Os> {
    let (rule, caps) = first_match(&rules.oss, ua)?;

    let name = expand_name(&rule.name, &caps);
    let known = known_oss::lookup(&name);
    let name = known.map_or(name, |os| os.name.to_string());
    let version = rule
        .version(ua, &caps)
        .and_then(|raw| clean_os_version(&raw));

    trace!(name = %name, version = version.as_deref(), "OS rule matched");

    Some(Os {
        name,
        version,
        platform: platform(ua).map(str::to_string),
        family: known.map(|os| os.family.to_string()),
    })
}

/// Detect the CPU architecture from the User-Agent.
pub fn platform(ua: &str) -> Option<&'static str> {
    PLATFORMS
        .iter()
        .find(|(_, re)| re.is_match(ua))
        .map(|(name, _)| *name)
}
