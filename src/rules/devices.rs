//! Device rules (`device/*.yml`) and vendor fragments.

use super::{pattern, Rule};
use crate::detection::DeviceType;
use crate::error::{DetectorError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BrandEntry {
    regex: String,
    #[serde(default)]
    device: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[serde(default)]
    regex: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    device: Option<String>,
    #[serde(default)]
    brand: Option<String>,
}

/// A model refinement under a brand entry.
#[derive(Debug)]
pub(crate) struct ModelRule {
    pub(crate) pattern: Option<Regex>,
    pub(crate) model: Option<String>,
    pub(crate) device_type: Option<DeviceType>,
    pub(crate) brand: Option<String>,
}

/// A brand entry: its pattern gates the model refinements.
#[derive(Debug)]
pub(crate) struct BrandRule {
    pattern: Regex,
    pub(crate) brand: String,
    pub(crate) device_type: Option<DeviceType>,
    pub(crate) model: Option<String>,
    pub(crate) models: Vec<ModelRule>,
}

impl Rule for BrandRule {
    fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// One device rule file, tried as a unit in pipeline order.
#[derive(Debug)]
pub(crate) struct DeviceGroup {
    pub(crate) name: &'static str,
    /// The group is skipped unless this pattern matches.
    pub(crate) gate: Option<Regex>,
    /// Every device from this group has this type; a passed gate with no
    /// brand match still yields a bare device of this type.
    pub(crate) forced_type: Option<DeviceType>,
    pub(crate) brands: Vec<BrandRule>,
}

/// Brand-identifying fragments used when no device rule named a brand.
#[derive(Debug)]
pub(crate) struct VendorFragment {
    pub(crate) brand: String,
    pub(crate) patterns: Vec<Regex>,
}

fn parse_device_type(value: Option<String>) -> Result<Option<DeviceType>> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.parse())
        .transpose()
}

fn compile_brand(file: &'static str, brand: String, entry: BrandEntry) -> Result<BrandRule> {
    let models = entry
        .models
        .into_iter()
        .map(|model| {
            Ok(ModelRule {
                pattern: model
                    .regex
                    .as_deref()
                    .map(|re| pattern::compile(file, re))
                    .transpose()?,
                model: model.model,
                device_type: parse_device_type(model.device)?,
                brand: model.brand.filter(|b| !b.is_empty()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BrandRule {
        pattern: pattern::compile(file, &entry.regex)?,
        brand,
        device_type: parse_device_type(entry.device)?,
        model: entry.model,
        models,
    })
}

/// Parse and compile one device rule file.
pub(crate) fn load(
    file: &'static str,
    gate: Option<&str>,
    forced_type: Option<DeviceType>,
    yaml: &str,
) -> Result<DeviceGroup> {
    let entries: IndexMap<String, BrandEntry> =
        serde_yaml::from_str(yaml).map_err(|source| DetectorError::Rules { file, source })?;
    let brands = entries
        .into_iter()
        .map(|(brand, entry)| compile_brand(file, brand, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(DeviceGroup {
        name: file,
        gate: gate.map(|g| pattern::compile(file, g)).transpose()?,
        forced_type,
        brands,
    })
}

/// Parse and compile `vendor_fragments.yml`.
pub(crate) fn load_vendor_fragments(file: &'static str, yaml: &str) -> Result<Vec<VendorFragment>> {
    let entries: IndexMap<String, Vec<String>> =
        serde_yaml::from_str(yaml).map_err(|source| DetectorError::Rules { file, source })?;

    entries
        .into_iter()
        .map(|(brand, fragments)| {
            let patterns = fragments
                .iter()
                .map(|fragment| pattern::compile(file, &format!("{fragment}[^a-z0-9]+")))
                .collect::<Result<Vec<_>>>()?;
            Ok(VendorFragment { brand, patterns })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
'Samsung':
  regex: 'SAMSUNG|SM-[A-Z0-9]+'
  device: 'smartphone'
  models:
    - regex: 'SM-X70[06]'
      model: 'Galaxy Tab S8'
      device: 'tablet'
    - model: ''
'Apple':
  regex: 'iPhone'
  device: 'smartphone'
  model: 'iPhone'
"#;

    #[test]
    fn test_brand_order_preserved() {
        let group = load("device/mobiles.yml", None, None, YAML).unwrap();
        let brands: Vec<_> = group.brands.iter().map(|b| b.brand.as_str()).collect();
        assert_eq!(brands, ["Samsung", "Apple"]);
        assert_eq!(group.brands[0].models[0].device_type, Some(DeviceType::Tablet));
        assert!(group.brands[0].models[1].pattern.is_none());
    }

    #[test]
    fn test_unknown_device_type_rejected() {
        let yaml = "'Acme':\n  regex: 'Acme'\n  device: 'hoverboard'\n";
        let err = load("device/mobiles.yml", None, None, yaml).unwrap_err();
        assert!(matches!(err, DetectorError::UnknownDeviceType(_)));
    }

    #[test]
    fn test_vendor_fragment_requires_separator() {
        let yaml = "'Dell':\n  - 'MDDR(?:JS)?'\n";
        let fragments = load_vendor_fragments("vendor_fragments.yml", yaml).unwrap();
        assert_eq!(fragments[0].brand, "Dell");
        assert!(fragments[0].patterns[0].is_match("Windows NT 6.1; MDDRJS)"));
        assert!(!fragments[0].patterns[0].is_match("MDDRJS"));
    }
}
