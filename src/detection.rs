//! Detection result types.
//!
//! A [`Detection`] is the immutable outcome of classifying one User-Agent:
//! optional bot, client, device and operating system sub-results plus the
//! derived [`Flags`]. Sub-results and their fields are optional
//! independently; a matched client without a version is still a client.

use crate::error::DetectorError;
use crate::flags::{self, Flags};
use crate::matchers::Classification;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An automated agent identified by a bot rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_url: Option<String>,
}

/// Client software categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClientType {
    #[serde(rename = "browser")]
    Browser,
    #[serde(rename = "feed reader")]
    FeedReader,
    #[serde(rename = "mobile app")]
    MobileApp,
    #[serde(rename = "pim")]
    Pim,
    #[serde(rename = "library")]
    Library,
    #[serde(rename = "media player")]
    MediaPlayer,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Browser => "browser",
            ClientType::FeedReader => "feed reader",
            ClientType::MobileApp => "mobile app",
            ClientType::Pim => "pim",
            ClientType::Library => "library",
            ClientType::MediaPlayer => "media player",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The software that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub name: String,

    #[serde(rename = "type")]
    pub client_type: ClientType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Rendering engine, for browsers.
    #[serde(rename = "browser_engine", skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Rendering engine version, for browsers.
    #[serde(rename = "browser_version", skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,

    /// Browser family (e.g. "Chrome" for "Chrome Mobile").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// Device classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceType {
    #[serde(rename = "smartphone")]
    SmartPhone,
    #[serde(rename = "feature phone")]
    FeaturePhone,
    #[serde(rename = "tablet")]
    Tablet,
    #[serde(rename = "phablet")]
    Phablet,
    #[serde(rename = "console")]
    Console,
    #[serde(rename = "portable media player")]
    PortableMediaPlayer,
    #[serde(rename = "car browser")]
    CarBrowser,
    #[serde(rename = "tv")]
    Television,
    #[serde(rename = "smart display")]
    SmartDisplay,
    #[serde(rename = "smart speaker")]
    SmartSpeaker,
    #[serde(rename = "camera")]
    Camera,
    #[serde(rename = "notebook")]
    Notebook,
    #[serde(rename = "wearable")]
    Wearable,
    #[serde(rename = "peripheral")]
    Peripheral,
    #[serde(rename = "desktop")]
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::SmartPhone => "smartphone",
            DeviceType::FeaturePhone => "feature phone",
            DeviceType::Tablet => "tablet",
            DeviceType::Phablet => "phablet",
            DeviceType::Console => "console",
            DeviceType::PortableMediaPlayer => "portable media player",
            DeviceType::CarBrowser => "car browser",
            DeviceType::Television => "tv",
            DeviceType::SmartDisplay => "smart display",
            DeviceType::SmartSpeaker => "smart speaker",
            DeviceType::Camera => "camera",
            DeviceType::Notebook => "notebook",
            DeviceType::Wearable => "wearable",
            DeviceType::Peripheral => "peripheral",
            DeviceType::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let device_type = match s.to_ascii_lowercase().as_str() {
            "smartphone" => DeviceType::SmartPhone,
            "feature phone" => DeviceType::FeaturePhone,
            "tablet" => DeviceType::Tablet,
            "phablet" => DeviceType::Phablet,
            "console" => DeviceType::Console,
            "portable media player" => DeviceType::PortableMediaPlayer,
            "car browser" => DeviceType::CarBrowser,
            "tv" => DeviceType::Television,
            "smart display" => DeviceType::SmartDisplay,
            "smart speaker" => DeviceType::SmartSpeaker,
            "camera" => DeviceType::Camera,
            "notebook" => DeviceType::Notebook,
            "wearable" => DeviceType::Wearable,
            "peripheral" => DeviceType::Peripheral,
            "desktop" => DeviceType::Desktop,
            _ => return Err(DetectorError::UnknownDeviceType(s.to_string())),
        };
        Ok(device_type)
    }
}

/// The hardware making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,

    /// A `Touch` token was seen in the User-Agent.
    #[serde(skip)]
    pub(crate) touch: bool,
}

impl Device {
    /// Whether the User-Agent advertised touch input.
    pub fn has_touch_signal(&self) -> bool {
        self.touch
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.brand.is_none() && self.model.is_none() && self.device_type.is_none()
    }
}

/// The operating system running the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Os {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// CPU architecture (ARM, MIPS, SuperH, x64, x86).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Coarse grouping such as "Android" or "Windows".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// The complete, immutable result of one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    #[serde(skip_serializing_if = "Option::is_none")]
    bot: Option<Bot>,

    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<Client>,

    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<Device>,

    #[serde(skip_serializing_if = "Option::is_none")]
    os: Option<Os>,

    #[serde(rename = "is")]
    flags: Flags,
}

impl Detection {
    /// A detection with every sub-result absent and every flag false.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bot(&self) -> Option<&Bot> {
        self.bot.as_ref()
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn os(&self) -> Option<&Os> {
        self.os.as_ref()
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Serialize to a single JSON object: `{bot?, client?, device?, os?, is}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Classification> for Detection {
    fn from(classification: Classification) -> Self {
        let flags = flags::derive(&classification);
        let Classification {
            bot,
            client,
            device,
            os,
        } = classification;

        Self {
            bot,
            client,
            device,
            os,
            flags,
        }
    }
}

macro_rules! flag_accessors {
    ($($method:ident => $field:ident),* $(,)?) => {
        impl Detection {
            $(
                #[inline]
                pub fn $method(&self) -> bool {
                    self.flags.$field
                }
            )*
        }
    };
}

flag_accessors! {
    is_bot => bot,
    is_mobile => mobile,
    is_touch_enabled => touch_enabled,
    is_pim => pim,
    is_feed_reader => feed_reader,
    is_mobile_app => mobile_app,
    is_media_player => media_player,
    is_browser => browser,
    is_library => library,
    is_desktop => desktop,
    is_console => console,
    is_car_browser => car_browser,
    is_camera => camera,
    is_portable_media_player => portable_media_player,
    is_notebook => notebook,
    is_television => television,
    is_smart_display => smart_display,
    is_feature_phone => feature_phone,
    is_smart_phone => smart_phone,
    is_tablet => tablet,
    is_phablet => phablet,
    is_smart_speaker => smart_speaker,
    is_peripheral => peripheral,
    is_wearable => wearable,
}
