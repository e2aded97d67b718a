//! Device Detector for Zentinel
//!
//! Classifies HTTP User-Agent strings into the bot, client software,
//! device and operating system behind a request, plus a fixed set of
//! boolean capability flags.
//!
//! # Features
//!
//! - Ordered, first-match-wins rule corpus (embedded YAML or a directory)
//! - Bot, browser, library, app, media player, feed reader and PIM detection
//! - Device brand/model/type detection with User-Agent heuristics
//! - Operating system name, version, platform and family
//! - Bounded, thread-safe LRU cache of completed detections
//!
//! # Example
//!
//! ```no_run
//! use zentinel_device_detector::Detector;
//!
//! let detector = Detector::new(10_000)?;
//! let detection = detector.lookup("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)");
//! assert!(detection.is_smart_phone());
//! detector.close();
//! # Ok::<(), zentinel_device_detector::DetectorError>(())
//! ```

pub mod cache;
pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod flags;
pub mod matchers;
pub mod rules;

pub use cache::CacheStats;
pub use config::DetectorConfig;
pub use detection::{Bot, Client, ClientType, Detection, Device, DeviceType, Os};
pub use detector::Detector;
pub use error::DetectorError;
pub use flags::Flags;
pub use matchers::{Classification, Matcher};
pub use rules::{CorpusSource, RuleDatabase};
