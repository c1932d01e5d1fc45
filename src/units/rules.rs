// Metric targets per unit type and numeric formatting

use super::config::{PrecisionConfig, Preferences};
use super::UnitType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricUnit {
    pub symbol: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    /// Written out in prose ("metres") rather than as a symbol ("mm")
    pub spelled_out: bool,
}

impl MetricUnit {
    const fn symbol(symbol: &'static str) -> Self {
        Self {
            symbol,
            singular: symbol,
            plural: symbol,
            spelled_out: false,
        }
    }

    const fn named(symbol: &'static str, singular: &'static str, plural: &'static str) -> Self {
        Self {
            symbol,
            singular,
            plural,
            spelled_out: true,
        }
    }

    /// Text for this unit after a formatted value
    pub fn display(&self, formatted_value: &str, adjectival: bool) -> &'static str {
        if !self.spelled_out {
            self.symbol
        } else if adjectival || formatted_value == "1" {
            self.singular
        } else {
            self.plural
        }
    }

    pub fn answers_to(&self, name: &str) -> bool {
        [self.symbol, self.singular, self.plural]
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }
}

pub const MILLIMETRE: MetricUnit = MetricUnit::symbol("mm");
pub const CENTIMETRE: MetricUnit = MetricUnit::symbol("cm");
pub const METRE: MetricUnit = MetricUnit::named("m", "metre", "metres");
pub const KILOMETRE: MetricUnit = MetricUnit::symbol("km");
pub const GRAM: MetricUnit = MetricUnit::symbol("g");
pub const KILOGRAM: MetricUnit = MetricUnit::symbol("kg");
pub const TONNE: MetricUnit = MetricUnit::named("t", "tonne", "tonnes");
pub const MILLILITRE: MetricUnit = MetricUnit::symbol("ml");
pub const LITRE: MetricUnit = MetricUnit::named("l", "litre", "litres");
pub const CELSIUS: MetricUnit = MetricUnit::symbol("°C");
pub const SQUARE_CENTIMETRE: MetricUnit = MetricUnit::symbol("cm²");
pub const SQUARE_METRE: MetricUnit = MetricUnit::named("m²", "square metre", "square metres");
pub const HECTARE: MetricUnit = MetricUnit::named("ha", "hectare", "hectares");
pub const SQUARE_KILOMETRE: MetricUnit = MetricUnit::symbol("km²");

/// Pick `unit` while the base magnitude is below `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRule {
    pub threshold: f64,
    pub unit: MetricUnit,
    /// Multiplier from the type's base unit into `unit`
    pub factor: f64,
    pub precision: usize,
}

/// Base units: mm, g, ml, °C and m²
fn table(unit_type: UnitType) -> &'static [(f64, MetricUnit, f64)] {
    match unit_type {
        UnitType::Length => &[
            (10.0, MILLIMETRE, 1.0),
            (1_000.0, CENTIMETRE, 0.1),
            (1_000_000.0, METRE, 0.001),
            (f64::INFINITY, KILOMETRE, 0.000_001),
        ],
        UnitType::Mass => &[
            (1_000.0, GRAM, 1.0),
            (1_000_000.0, KILOGRAM, 0.001),
            (f64::INFINITY, TONNE, 0.000_001),
        ],
        UnitType::Volume => &[(1_000.0, MILLILITRE, 1.0), (f64::INFINITY, LITRE, 0.001)],
        UnitType::Temperature => &[(f64::INFINITY, CELSIUS, 1.0)],
        UnitType::Area => &[
            (0.1, SQUARE_CENTIMETRE, 10_000.0),
            (10_000.0, SQUARE_METRE, 1.0),
            (1_000_000.0, HECTARE, 0.000_1),
            (f64::INFINITY, SQUARE_KILOMETRE, 0.000_001),
        ],
    }
}

/// Ordered rules for a unit type at the configured precision
pub fn rules_for(
    unit_type: UnitType,
    precision: &PrecisionConfig,
    preferences: &Preferences,
) -> Vec<ConversionRule> {
    let decimals = precision
        .for_type(unit_type)
        .min(preferences.max_decimal_places);

    table(unit_type)
        .iter()
        .map(|&(threshold, unit, factor)| ConversionRule {
            threshold,
            unit,
            factor,
            precision: decimals,
        })
        .collect()
}

/// First rule whose threshold exceeds the magnitude of `base`.
/// Zero has no magnitude to go by and takes the middle of the table.
pub fn select(rules: &[ConversionRule], base: f64) -> Option<&ConversionRule> {
    let magnitude = base.abs();
    if magnitude == 0.0 {
        return rules.get(rules.len() / 2);
    }
    rules
        .iter()
        .find(|rule| magnitude < rule.threshold)
        .or_else(|| rules.last())
}

/// Format with at most `precision` decimals, trailing zeros trimmed
pub fn format_value(value: f64, precision: usize, preferences: &Preferences) -> String {
    let whole = value.round();
    let formatted = if preferences.prefer_whole_numbers
        && (value - whole).abs() < preferences.rounding_threshold
    {
        format!("{whole:.0}")
    } else {
        let fixed = format!("{value:.precision$}");
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    };

    if formatted.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        "0".to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length_rules() -> Vec<ConversionRule> {
        rules_for(
            UnitType::Length,
            &PrecisionConfig::default(),
            &Preferences::default(),
        )
    }

    #[test]
    fn test_threshold_selection_uses_converted_magnitude() {
        let rules = length_rules();
        assert_eq!(select(&rules, 6.35).unwrap().unit, MILLIMETRE);
        assert_eq!(select(&rules, 304.8).unwrap().unit, CENTIMETRE);
        assert_eq!(select(&rules, 3048.0).unwrap().unit, METRE);
        assert_eq!(select(&rules, 1_609_344.0).unwrap().unit, KILOMETRE);
        assert_eq!(select(&rules, -3048.0).unwrap().unit, METRE);
        assert_eq!(select(&rules, 0.0).unwrap().unit, METRE);
    }

    #[test]
    fn test_formatting() {
        let prefs = Preferences::default();
        assert_eq!(format_value(6.35, 1, &prefs), "6.3");
        assert_eq!(format_value(30.48, 1, &prefs), "30.5");
        assert_eq!(format_value(3.048, 1, &prefs), "3");
        assert_eq!(format_value(3.6576, 1, &prefs), "3.7");
        assert_eq!(format_value(2.5, 2, &prefs), "2.5");
        assert_eq!(format_value(-40.0, 1, &prefs), "-40");
        assert_eq!(format_value(-0.01, 1, &prefs), "0");
    }

    #[test]
    fn test_whole_number_preference_can_be_disabled() {
        let prefs = Preferences {
            prefer_whole_numbers: false,
            ..Default::default()
        };
        assert_eq!(format_value(3.048, 1, &prefs), "3");
        assert_eq!(format_value(3.048, 2, &prefs), "3.05");
    }

    #[test]
    fn test_precision_is_capped() {
        let precision = PrecisionConfig {
            length: 6,
            ..Default::default()
        };
        let rules = rules_for(UnitType::Length, &precision, &Preferences::default());
        assert!(rules.iter().all(|r| r.precision == 2));
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(METRE.display("3.7", false), "metres");
        assert_eq!(METRE.display("1", false), "metre");
        assert_eq!(METRE.display("1.8", true), "metre");
        assert_eq!(MILLIMETRE.display("6.3", false), "mm");
        assert!(SQUARE_METRE.answers_to("Square Metres"));
    }
}
