//! Device matching.
//!
//! Device rule files are tried in order; the first brand whose pattern
//! matches decides brand, model and type. A series of User-Agent
//! heuristics then fills in or corrects the type using the operating
//! system and client already detected.

use super::compare_versions;
use crate::detection::{Client, Device, DeviceType, Os};
use crate::rules::pattern::{self, expand};
use crate::rules::{known_browsers, known_oss, BrandRule, DeviceGroup, Rule, RuleDatabase};
use regex::{Captures, Regex};
use std::cmp::Ordering;
use std::sync::LazyLock;
use tracing::trace;

fn heuristic(re: &str) -> Regex {
    pattern::build(re).expect("valid device heuristic pattern")
}

static TOUCH: LazyLock<Regex> = LazyLock::new(|| heuristic("Touch"));
static ANDROID_VR: LazyLock<Regex> =
    LazyLock::new(|| heuristic(r"Android(?: [.0-9]+)?; Mobile VR;| VR "));
static CHROME: LazyLock<Regex> = LazyLock::new(|| heuristic(r"Chrome/[.0-9]*"));
static MOBILE_TOKEN: LazyLock<Regex> = LazyLock::new(|| heuristic("(?:Mobile|eliboM)"));
static SAFARI: LazyLock<Regex> = LazyLock::new(|| heuristic("Safari/"));
static PAD: LazyLock<Regex> = LazyLock::new(|| heuristic("Pad/APad"));
static ANDROID_TABLET: LazyLock<Regex> =
    LazyLock::new(|| heuristic(r"Android(?: [.0-9]+)?; Tablet;|.*-tablet$"));
static TABLET_NOT_PC: LazyLock<Regex> = LazyLock::new(|| heuristic("(Tablet)( PC)?"));
static OPERA_TABLET: LazyLock<Regex> = LazyLock::new(|| heuristic("Opera Tablet"));
static ANDROID_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| heuristic(r"Android(?: [.0-9]+)?; Mobile;|.*-mobile$"));
static TV_ALWAYS: LazyLock<Regex> = LazyLock::new(|| {
    heuristic(r"Opera TV Store| OMI/|Andr0id|(?:Android(?: UHD)?|Google) TV|\(lite\) TV|BRAVIA")
});
static TV_IF_UNKNOWN: LazyLock<Regex> = LazyLock::new(|| heuristic(r"SmartTV|Tizen.+ TV .+$"));
static TV_PAREN: LazyLock<Regex> = LazyLock::new(|| heuristic(r"\(TV;"));
static DESKTOP_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| heuristic(r"Desktop(?: (?:x(?:32|64)|WOW64))?;"));

/// Browsers that only ship on televisions.
const TV_BROWSERS: &[&str] = &[
    "Kylo",
    "Espial TV Browser",
    "LUJO TV Browser",
    "LogicUI TV Browser",
    "Open TV Browser",
    "Seraphic Sraf",
    "Opera Devices",
    "Crow Browser",
    "Vewd Browser",
    "TiviMate",
    "Quick Search TV",
    "QJY TV Browser",
    "TV Bro",
];

/// Match the User-Agent against the device rules and refine the result.
///
/// Returns `None` when neither brand, model nor type could be determined.
pub fn detect(
    rules: &RuleDatabase,
    ua: &str,
    os: Option<&Os>,
    client: Option<&Client>,
) -> Option<Device> {
    let mut device = match_groups(&rules.devices, ua).unwrap_or_default();
    refine(rules, ua, &mut device, os, client);

    if device.is_empty() {
        return None;
    }

    trace!(
        brand = device.brand.as_deref(),
        model = device.model.as_deref(),
        device_type = device.device_type.map(|t| t.as_str()),
        "Device resolved"
    );
    Some(device)
}

fn match_groups(groups: &[DeviceGroup], ua: &str) -> Option<Device> {
    for group in groups {
        if let Some(gate) = &group.gate {
            if !gate.is_match(ua) {
                continue;
            }
        }

        if let Some(mut device) = group.brands.iter().find_map(|brand| match_brand(brand, ua)) {
            if let Some(forced) = group.forced_type {
                device.device_type = Some(forced);
            }
            trace!(group = group.name, "Device rule matched");
            return Some(device);
        }

        if group.gate.is_some() {
            if let Some(forced) = group.forced_type {
                return Some(Device {
                    device_type: Some(forced),
                    ..Device::default()
                });
            }
        }
    }

    None
}

fn match_brand(rule: &BrandRule, ua: &str) -> Option<Device> {
    let caps = rule.pattern().captures(ua)?;

    let mut brand = Some(rule.brand.clone());
    let mut device_type = rule.device_type;
    let mut model = rule.model.as_ref().map(|template| expand(template, &caps));

    for model_rule in &rule.models {
        let expanded = match &model_rule.pattern {
            Some(re) => match re.captures(ua) {
                Some(model_caps) => expand_model(model_rule.model.as_deref(), &model_caps),
                None => continue,
            },
            None => expand_model(model_rule.model.as_deref(), &caps),
        };

        model = expanded;
        if model_rule.device_type.is_some() {
            device_type = model_rule.device_type;
        }
        if let Some(model_brand) = &model_rule.brand {
            brand = Some(model_brand.clone());
        }
        break;
    }

    Some(Device {
        brand: brand.filter(|b| b != "Unknown"),
        model: model.as_deref().and_then(clean_model),
        device_type,
        touch: false,
    })
}

fn expand_model(template: Option<&str>, caps: &Captures<'_>) -> Option<String> {
    template.map(|t| expand(t, caps))
}

/// Tidy an extracted model name; placeholders become absent.
fn clean_model(raw: &str) -> Option<String> {
    let model = raw.replace('_', " ");
    let model = model.trim();
    let model = model.strip_suffix(" TD").unwrap_or(model).trim();

    if model.is_empty() || model.eq_ignore_ascii_case("Build") {
        None
    } else {
        Some(model.to_string())
    }
}

fn refine(
    rules: &RuleDatabase,
    ua: &str,
    device: &mut Device,
    os: Option<&Os>,
    client: Option<&Client>,
) {
    let os_name = os.map(|o| o.name.as_str()).unwrap_or_default();
    let os_family = os.and_then(|o| o.family.as_deref()).unwrap_or_default();
    let os_version = os.and_then(|o| o.version.as_deref()).unwrap_or_default();
    let client_name = client.map(|c| c.name.as_str()).unwrap_or_default();

    device.touch = TOUCH.is_match(ua);

    if device.brand.is_none() {
        device.brand = rules
            .vendor_fragments
            .iter()
            .find(|fragment| fragment.patterns.iter().any(|re| re.is_match(ua)))
            .map(|fragment| fragment.brand.clone());
    }

    let apple_os = known_oss::is_apple_os(os_name);
    if device.brand.as_deref() == Some("Apple") && !apple_os {
        *device = Device {
            touch: device.touch,
            ..Device::default()
        };
    } else if device.brand.is_none() && apple_os {
        device.brand = Some("Apple".to_string());
    }

    let android = os_family == "Android";

    if device.device_type.is_none() && android && ANDROID_VR.is_match(ua) {
        device.device_type = Some(DeviceType::Wearable);
    }

    // Chrome on Android marks phones with "Mobile"; tablets omit it.
    if device.device_type.is_none() && android && CHROME.is_match(ua) {
        if MOBILE_TOKEN.is_match(ua) {
            device.device_type = Some(DeviceType::SmartPhone);
        } else if SAFARI.is_match(ua) {
            device.device_type = Some(DeviceType::Tablet);
        }
    }

    if device.device_type == Some(DeviceType::SmartPhone) && PAD.is_match(ua) {
        device.device_type = Some(DeviceType::Tablet);
    }

    if device.device_type.is_none() && (has_android_tablet_fragment(ua) || OPERA_TABLET.is_match(ua))
    {
        device.device_type = Some(DeviceType::Tablet);
    }

    if device.device_type.is_none() && ANDROID_MOBILE.is_match(ua) {
        device.device_type = Some(DeviceType::SmartPhone);
    }

    if device.device_type.is_none() && os_name == "Android" && !os_version.is_empty() {
        if compare_versions(os_version, "2.0") == Some(Ordering::Less) {
            device.device_type = Some(DeviceType::SmartPhone);
        } else if compare_versions(os_version, "3.0").is_some_and(|o| o != Ordering::Less)
            && compare_versions(os_version, "4.0") == Some(Ordering::Less)
        {
            device.device_type = Some(DeviceType::Tablet);
        }
    }

    if device.device_type == Some(DeviceType::FeaturePhone) && android {
        device.device_type = Some(DeviceType::SmartPhone);
    }

    if device.device_type.is_none() && os_name == "Java ME" {
        device.device_type = Some(DeviceType::FeaturePhone);
    }

    // Windows RT is tablet-only; Windows 8 and later only with a touch token.
    let windows_8_or_later = os_name == "Windows"
        && compare_versions(os_version, "8").is_some_and(|o| o != Ordering::Less);
    if device.device_type.is_none()
        && (os_name == "Windows RT" || (windows_8_or_later && device.touch))
    {
        device.device_type = Some(DeviceType::Tablet);
    }

    if TV_ALWAYS.is_match(ua) {
        device.device_type = Some(DeviceType::Television);
    }

    if device.device_type.is_none() && TV_IF_UNKNOWN.is_match(ua) {
        device.device_type = Some(DeviceType::Television);
    }

    if TV_BROWSERS.contains(&client_name) {
        device.device_type = Some(DeviceType::Television);
    }

    if device.device_type.is_none() && TV_PAREN.is_match(ua) {
        device.device_type = Some(DeviceType::Television);
    }

    if DESKTOP_FRAGMENT.is_match(ua) {
        device.device_type = Some(DeviceType::Desktop);
    }

    if device.device_type.is_none() && is_desktop(os, client) {
        device.device_type = Some(DeviceType::Desktop);
    }
}

fn has_android_tablet_fragment(ua: &str) -> bool {
    if ANDROID_TABLET.is_match(ua) {
        return true;
    }
    // "Tablet" alone, not "Tablet PC".
    TABLET_NOT_PC
        .captures_iter(ua)
        .any(|caps| caps.get(2).is_none())
}

/// A desktop operating system with a client that is not mobile-only.
fn is_desktop(os: Option<&Os>, client: Option<&Client>) -> bool {
    let desktop_os = os
        .and_then(|o| o.family.as_deref())
        .is_some_and(known_oss::is_desktop_family);
    let mobile_browser = client.is_some_and(|c| known_browsers::is_mobile_only(&c.name));

    desktop_os && !mobile_browser
}
