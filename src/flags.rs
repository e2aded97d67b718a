//! Capability flags derived from a classification.

use crate::detection::{ClientType, DeviceType};
use crate::matchers::Classification;
use serde::Serialize;

/// The fixed set of boolean predicates exposed for every detection.
///
/// All flags are always defined. At most one device-class flag is true,
/// since a device carries a single [`DeviceType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Flags {
    pub bot: bool,
    pub mobile: bool,
    pub touch_enabled: bool,
    pub pim: bool,
    pub feed_reader: bool,
    pub mobile_app: bool,
    pub media_player: bool,
    pub browser: bool,
    pub library: bool,
    pub desktop: bool,
    pub console: bool,
    pub car_browser: bool,
    pub camera: bool,
    pub portable_media_player: bool,
    pub notebook: bool,
    pub television: bool,
    pub smart_display: bool,
    pub feature_phone: bool,
    pub smart_phone: bool,
    pub tablet: bool,
    pub phablet: bool,
    pub smart_speaker: bool,
    pub peripheral: bool,
    pub wearable: bool,
}

impl Flags {
    /// Number of flags.
    pub const COUNT: usize = 24;

    /// All flags as `(name, value)` pairs, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            ("bot", self.bot),
            ("mobile", self.mobile),
            ("touch_enabled", self.touch_enabled),
            ("pim", self.pim),
            ("feed_reader", self.feed_reader),
            ("mobile_app", self.mobile_app),
            ("media_player", self.media_player),
            ("browser", self.browser),
            ("library", self.library),
            ("desktop", self.desktop),
            ("console", self.console),
            ("car_browser", self.car_browser),
            ("camera", self.camera),
            ("portable_media_player", self.portable_media_player),
            ("notebook", self.notebook),
            ("television", self.television),
            ("smart_display", self.smart_display),
            ("feature_phone", self.feature_phone),
            ("smart_phone", self.smart_phone),
            ("tablet", self.tablet),
            ("phablet", self.phablet),
            ("smart_speaker", self.smart_speaker),
            ("peripheral", self.peripheral),
            ("wearable", self.wearable),
        ]
        .into_iter()
    }

    /// The device-class flags; at most one is ever true.
    pub fn device_class(&self) -> [bool; 15] {
        [
            self.desktop,
            self.console,
            self.car_browser,
            self.camera,
            self.portable_media_player,
            self.notebook,
            self.television,
            self.smart_display,
            self.feature_phone,
            self.smart_phone,
            self.tablet,
            self.phablet,
            self.smart_speaker,
            self.peripheral,
            self.wearable,
        ]
    }
}

/// Derive the flag set for a classification.
///
/// A present bot wins outright: every other flag is false, whatever the
/// client and device rules matched along the way.
pub fn derive(classification: &Classification) -> Flags {
    if classification.bot.is_some() {
        return Flags {
            bot: true,
            ..Flags::default()
        };
    }

    let device_type = classification
        .device
        .as_ref()
        .and_then(|device| device.device_type);
    let touch_signal = classification
        .device
        .as_ref()
        .is_some_and(|device| device.touch);
    let client_type = classification.client.as_ref().map(|client| client.client_type);

    let device_is = |wanted: DeviceType| device_type == Some(wanted);
    let client_is = |wanted: ClientType| client_type == Some(wanted);

    Flags {
        bot: false,
        mobile: matches!(
            device_type,
            Some(
                DeviceType::SmartPhone
                    | DeviceType::FeaturePhone
                    | DeviceType::Tablet
                    | DeviceType::Phablet
            )
        ),
        touch_enabled: touch_signal
            || matches!(
                device_type,
                Some(
                    DeviceType::SmartPhone
                        | DeviceType::Tablet
                        | DeviceType::Phablet
                        | DeviceType::SmartDisplay
                )
            ),
        pim: client_is(ClientType::Pim),
        feed_reader: client_is(ClientType::FeedReader),
        mobile_app: client_is(ClientType::MobileApp),
        media_player: client_is(ClientType::MediaPlayer),
        browser: client_is(ClientType::Browser),
        library: client_is(ClientType::Library),
        desktop: device_is(DeviceType::Desktop),
        console: device_is(DeviceType::Console),
        car_browser: device_is(DeviceType::CarBrowser),
        camera: device_is(DeviceType::Camera),
        portable_media_player: device_is(DeviceType::PortableMediaPlayer),
        notebook: device_is(DeviceType::Notebook),
        television: device_is(DeviceType::Television),
        smart_display: device_is(DeviceType::SmartDisplay),
        feature_phone: device_is(DeviceType::FeaturePhone),
        smart_phone: device_is(DeviceType::SmartPhone),
        tablet: device_is(DeviceType::Tablet),
        phablet: device_is(DeviceType::Phablet),
        smart_speaker: device_is(DeviceType::SmartSpeaker),
        peripheral: device_is(DeviceType::Peripheral),
        wearable: device_is(DeviceType::Wearable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Bot, Client, Device};

    fn device(device_type: DeviceType) -> Option<Device> {
        Some(Device {
            device_type: Some(device_type),
            ..Device::default()
        })
    }

    fn client(client_type: ClientType) -> Option<Client> {
        Some(Client {
            name: "test".to_string(),
            client_type,
            version: None,
            engine: None,
            engine_version: None,
            family: None,
        })
    }

    #[test]
    fn test_empty_classification() {
        let flags = derive(&Classification::default());
        assert_eq!(flags, Flags::default());
        assert_eq!(flags.iter().count(), Flags::COUNT);
    }

    #[test]
    fn test_mobile_device_types() {
        for device_type in [
            DeviceType::SmartPhone,
            DeviceType::FeaturePhone,
            DeviceType::Tablet,
            DeviceType::Phablet,
        ] {
            let flags = derive(&Classification {
                device: device(device_type),
                ..Classification::default()
            });
            assert!(flags.mobile, "{device_type} should be mobile");
        }

        for device_type in [
            DeviceType::Desktop,
            DeviceType::Television,
            DeviceType::Camera,
            DeviceType::PortableMediaPlayer,
        ] {
            let flags = derive(&Classification {
                device: device(device_type),
                ..Classification::default()
            });
            assert!(!flags.mobile, "{device_type} should not be mobile");
        }
    }

    #[test]
    fn test_touch_from_device_type_or_signal() {
        let flags = derive(&Classification {
            device: device(DeviceType::SmartDisplay),
            ..Classification::default()
        });
        assert!(flags.touch_enabled);

        let flags = derive(&Classification {
            device: device(DeviceType::Desktop),
            ..Classification::default()
        });
        assert!(!flags.touch_enabled);

        let flags = derive(&Classification {
            device: Some(Device {
                device_type: Some(DeviceType::Desktop),
                touch: true,
                ..Device::default()
            }),
            ..Classification::default()
        });
        assert!(flags.touch_enabled);
        assert!(flags.desktop);
    }

    #[test]
    fn test_client_type_flags() {
        let flags = derive(&Classification {
            client: client(ClientType::FeedReader),
            ..Classification::default()
        });
        assert!(flags.feed_reader);
        assert!(!flags.browser);

        let flags = derive(&Classification {
            client: client(ClientType::MediaPlayer),
            ..Classification::default()
        });
        assert!(flags.media_player);
    }

    #[test]
    fn test_device_class_exclusive() {
        let flags = derive(&Classification {
            device: device(DeviceType::Tablet),
            client: client(ClientType::Browser),
            ..Classification::default()
        });
        assert_eq!(flags.device_class().iter().filter(|f| **f).count(), 1);
        assert!(flags.tablet);
    }

    #[test]
    fn test_bot_suppresses_other_flags() {
        let flags = derive(&Classification {
            bot: Some(Bot {
                name: Some("Googlebot".to_string()),
                ..Bot::default()
            }),
            client: client(ClientType::MobileApp),
            device: device(DeviceType::SmartPhone),
            os: None,
        });

        assert!(flags.bot);
        assert!(!flags.mobile_app);
        assert!(!flags.touch_enabled);
        assert!(!flags.smart_phone);
        assert_eq!(flags.iter().filter(|(_, v)| *v).count(), 1);
    }
}
