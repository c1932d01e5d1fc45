use super::UnitType;
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Unit conversion settings, read from JSON. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnitConfig {
    pub enabled: bool,
    pub enabled_unit_types: Vec<UnitType>,
    pub detection: DetectionConfig,
    pub precision: PrecisionConfig,
    pub preferences: Preferences,
    /// Extra idiomatic phrases that suppress a conversion
    pub exclude_patterns: Vec<String>,
    /// Source unit -> forced metric unit, e.g. `{"feet": "cm"}`
    pub custom_mappings: HashMap<String, String>,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            enabled_unit_types: UnitType::ALL.to_vec(),
            detection: DetectionConfig::default(),
            precision: PrecisionConfig::default(),
            preferences: Preferences::default(),
            exclude_patterns: Vec::new(),
            custom_mappings: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    pub min_confidence: f64,
    /// Words allowed between a number and its unit
    pub max_number_distance: usize,
    pub detect_compound_units: bool,
    pub detect_written_numbers: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            max_number_distance: 2,
            detect_compound_units: true,
            detect_written_numbers: false,
        }
    }
}

/// Decimal places per unit type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisionConfig {
    pub length: usize,
    pub mass: usize,
    pub volume: usize,
    pub temperature: usize,
    pub area: usize,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            length: 1,
            mass: 1,
            volume: 1,
            temperature: 1,
            area: 1,
        }
    }
}

impl PrecisionConfig {
    pub fn for_type(&self, unit_type: UnitType) -> usize {
        match unit_type {
            UnitType::Length => self.length,
            UnitType::Mass => self.mass,
            UnitType::Volume => self.volume,
            UnitType::Temperature => self.temperature,
            UnitType::Area => self.area,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub prefer_whole_numbers: bool,
    pub max_decimal_places: usize,
    /// Distance from the nearest integer below which a value is shown whole
    pub rounding_threshold: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            prefer_whole_numbers: true,
            max_decimal_places: 2,
            rounding_threshold: 0.05,
        }
    }
}

impl UnitConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse unit configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read unit config: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse unit config: {}", path.display()))
    }

    /// Load from `path`, falling back to defaults when absent or malformed
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.exists() => Self::from_file(path).unwrap_or_else(|e| {
                warn!("Using default unit configuration: {:#}", e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn is_type_enabled(&self, unit_type: UnitType) -> bool {
        self.enabled_unit_types.contains(&unit_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = UnitConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.detection.min_confidence, 0.5);
        assert_eq!(config.enabled_unit_types.len(), 5);
        assert_eq!(config.precision.for_type(UnitType::Length), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = UnitConfig::from_json(
            r#"{
                "enabled": true,
                "enabledUnitTypes": ["length", "temperature"],
                "detection": { "detectWrittenNumbers": true },
                "precision": { "length": 2 },
                "customMappings": { "feet": "cm" }
            }"#,
        )
        .unwrap();

        assert!(config.enabled);
        assert!(config.is_type_enabled(UnitType::Length));
        assert!(!config.is_type_enabled(UnitType::Mass));
        assert!(config.detection.detect_written_numbers);
        assert_eq!(config.detection.max_number_distance, 2);
        assert_eq!(config.precision.length, 2);
        assert_eq!(config.precision.mass, 1);
        assert_eq!(config.preferences.rounding_threshold, 0.05);
        assert_eq!(config.custom_mappings["feet"], "cm");
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("units.json");
        fs::write(&path, "[1, 2").unwrap();

        assert_eq!(UnitConfig::load(Some(&path)), UnitConfig::default());
        assert_eq!(UnitConfig::load(None), UnitConfig::default());
    }
}
