pub mod config;
pub mod detect;
pub mod rules;

pub use config::UnitConfig;

use crate::{Change, ChangeKind};
use aho_corasick::AhoCorasick;
use detect::{Gap, NumberToken, SourceUnit, UnitToken};
use log::{debug, warn};
use rules::{ConversionRule, MetricUnit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Length,
    #[serde(alias = "weight")]
    Mass,
    Volume,
    Temperature,
    Area,
}

impl UnitType {
    pub const ALL: [UnitType; 5] = [
        UnitType::Length,
        UnitType::Mass,
        UnitType::Volume,
        UnitType::Temperature,
        UnitType::Area,
    ];
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitType::Length => write!(f, "length"),
            UnitType::Mass => write!(f, "mass"),
            UnitType::Volume => write!(f, "volume"),
            UnitType::Temperature => write!(f, "temperature"),
            UnitType::Area => write!(f, "area"),
        }
    }
}

/// One detected imperial measurement
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMatch {
    /// Value in the source unit; feet-and-inches are folded into feet
    pub value: f64,
    pub raw_unit: String,
    pub unit_type: UnitType,
    /// Byte offset of the number
    pub position: usize,
    /// Byte offset just past the unit
    pub end: usize,
    pub confidence: f64,
    pub unit_name: &'static str,
    pub number_end: usize,
    pub unit_start: usize,
    /// Words between number and unit
    pub distance: usize,
    /// Hyphenated adjective form such as "6-foot"
    pub adjectival: bool,
}

/// Detects and rewrites imperial measurements. Holds no per-call state.
#[derive(Debug, Clone)]
pub struct UnitConverter {
    config: UnitConfig,
    idioms: AhoCorasick,
    rules: HashMap<UnitType, Vec<ConversionRule>>,
    custom: HashMap<&'static str, MetricUnit>,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(UnitConfig::default())
    }
}

impl UnitConverter {
    pub fn new(config: UnitConfig) -> Self {
        let idioms = detect::idiom_matcher(&config.exclude_patterns).unwrap_or_else(|e| {
            warn!("Ignoring configured unit exclude patterns: {}", e);
            detect::idiom_matcher(&[]).expect("built-in idioms compile")
        });

        let rules: HashMap<UnitType, Vec<ConversionRule>> = UnitType::ALL
            .iter()
            .map(|&t| (t, rules::rules_for(t, &config.precision, &config.preferences)))
            .collect();

        let mut custom = HashMap::new();
        for (source, target) in &config.custom_mappings {
            let Some(unit) = detect::resolve_alias(source) else {
                warn!("Unknown unit '{}' in custom mappings", source);
                continue;
            };
            let metric = rules
                .get(&unit.unit_type)
                .and_then(|rs| rs.iter().find(|r| r.unit.answers_to(target)))
                .map(|r| r.unit);
            match metric {
                Some(metric) => {
                    custom.insert(unit.name, metric);
                }
                None => warn!(
                    "Cannot map '{}' to '{}': not a {} unit",
                    source, target, unit.unit_type
                ),
            }
        }

        Self {
            config,
            idioms,
            rules,
            custom,
        }
    }

    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Measurements in `text` that pass confidence, type and idiom checks
    pub fn detect(&self, text: &str) -> Vec<UnitMatch> {
        let detection = &self.config.detection;
        let idioms = detect::idiom_ranges(&self.idioms, text);
        let numbers = detect::scan_numbers(text, detection.detect_written_numbers);

        let mut matches: Vec<UnitMatch> = Vec::new();
        let mut last_end = 0;

        for (idx, number) in numbers.iter().enumerate() {
            if number.start < last_end {
                continue;
            }
            let Some(candidate) = self.candidate(text, number, &numbers[idx + 1..]) else {
                continue;
            };

            if candidate.confidence < detection.min_confidence {
                debug!(
                    "Skipping '{}' (confidence {:.2})",
                    &text[candidate.position..candidate.end],
                    candidate.confidence
                );
                continue;
            }
            if !self.config.is_type_enabled(candidate.unit_type) {
                continue;
            }
            if idioms
                .iter()
                .any(|&(start, end)| start < candidate.end && candidate.position < end)
            {
                debug!(
                    "Skipping idiom '{}'",
                    &text[candidate.position..candidate.end]
                );
                continue;
            }

            last_end = candidate.end;
            matches.push(candidate);
        }

        matches
    }

    fn candidate(&self, text: &str, number: &NumberToken, following: &[NumberToken]) -> Option<UnitMatch> {
        let detection = &self.config.detection;
        let compound = detection.detect_compound_units;

        if compound && !number.written {
            if let Some(m) = self.prime_feet_inches(text, number, following) {
                return Some(m);
            }
        }

        let rest = &text[number.end..];
        let (gap, mut pos) = if compound && rest.starts_with('-') {
            (Gap::Hyphen, number.end + 1)
        } else {
            let spaces = leading_spaces(rest);
            match spaces {
                0 if number.written => return None,
                0 => (Gap::Attached, number.end),
                n => (Gap::Spaced, number.end + n),
            }
        };

        let mut distance = 0;
        let token = loop {
            if let Some(token) = detect::unit_at(text, pos) {
                break token;
            }
            if gap != Gap::Spaced || distance >= detection.max_number_distance {
                return None;
            }
            let word_len = text[pos..]
                .char_indices()
                .find(|(_, c)| !c.is_alphabetic())
                .map_or(text.len() - pos, |(i, _)| i);
            if word_len == 0 || !detect::is_measure_modifier(&text[pos..pos + word_len]) {
                return None;
            }
            let spaces = leading_spaces(&text[pos + word_len..]);
            if spaces == 0 {
                return None;
            }
            pos += word_len + spaces;
            distance += 1;
        };

        let prefix = text[..number.start].chars().next_back();
        let confidence = detect::confidence(token.certainty, gap, distance, prefix);
        let mut m = self.unit_match(text, number, &token, confidence, distance, gap == Gap::Hyphen);

        if compound && distance == 0 && gap == Gap::Spaced && token.unit.name == "foot" {
            if let Some(inches) = self.trailing_inches(text, token.end, following) {
                m.value += inches.0 / 12.0;
                m.end = inches.1;
                m.raw_unit = text[m.unit_start..m.end].to_string();
            }
        }

        Some(m)
    }

    fn unit_match(
        &self,
        text: &str,
        number: &NumberToken,
        token: &UnitToken,
        confidence: f64,
        distance: usize,
        adjectival: bool,
    ) -> UnitMatch {
        UnitMatch {
            value: number.value,
            raw_unit: text[token.start..token.end].to_string(),
            unit_type: token.unit.unit_type,
            position: number.start,
            end: token.end,
            confidence,
            unit_name: token.unit.name,
            number_end: number.end,
            unit_start: token.start,
            distance,
            adjectival,
        }
    }

    /// "5 feet 10 inches" / "5 ft 10 in": the inches number and where it ends
    fn trailing_inches(&self, text: &str, after_feet: usize, following: &[NumberToken]) -> Option<(f64, usize)> {
        let spaces = leading_spaces(&text[after_feet..]);
        let next = following.first()?;
        if spaces == 0 || next.start != after_feet + spaces || next.written {
            return None;
        }
        let gap = leading_spaces(&text[next.end..]);
        let token = detect::unit_at(text, next.end + gap)?;
        (token.unit.name == "inch").then_some((next.value, token.end))
    }

    /// `5'10"` with straight, prime or curly marks
    fn prime_feet_inches(&self, text: &str, number: &NumberToken, following: &[NumberToken]) -> Option<UnitMatch> {
        let rest = &text[number.end..];
        let feet_mark = rest.chars().next().filter(|c| matches!(c, '\'' | '\u{2032}' | '\u{2019}'))?;
        let inches_start = number.end + feet_mark.len_utf8();
        let next = following.first().filter(|n| n.start == inches_start)?;
        let inch_mark = text[next.end..]
            .chars()
            .next()
            .filter(|c| matches!(c, '"' | '\u{2033}' | '\u{201D}'))?;
        let end = next.end + inch_mark.len_utf8();

        Some(UnitMatch {
            value: number.value + next.value / 12.0,
            raw_unit: text[number.end..end].to_string(),
            unit_type: UnitType::Length,
            position: number.start,
            end,
            confidence: 1.0,
            unit_name: "foot",
            number_end: number.end,
            unit_start: number.end,
            distance: 0,
            adjectival: false,
        })
    }

    fn source(m: &UnitMatch) -> Option<&'static SourceUnit> {
        detect::source_unit(m.unit_name)
    }

    /// Metric value and unit text for a match
    pub fn render(&self, m: &UnitMatch) -> Option<(String, &'static str, MetricUnit)> {
        let source = Self::source(m)?;
        let base = match m.unit_type {
            UnitType::Temperature => (m.value - 32.0) * 5.0 / 9.0,
            _ => m.value * source.to_base,
        };

        let rules = self.rules.get(&m.unit_type)?;
        let rule = match self.custom.get(source.name) {
            Some(unit) => rules.iter().find(|r| r.unit == *unit)?,
            None => rules::select(rules, base)?,
        };

        let formatted = rules::format_value(base * rule.factor, rule.precision, &self.config.preferences);
        let unit_text = rule.unit.display(&formatted, m.adjectival);
        Some((formatted, unit_text, rule.unit))
    }

    /// Rewrite every detected measurement in `text`
    pub fn convert(&self, text: &str) -> (String, Vec<Change>) {
        let mut edits: Vec<(usize, usize, String)> = Vec::new();
        let mut changes = Vec::new();

        for m in self.detect(text) {
            let Some((value, unit_text, unit)) = self.render(&m) else {
                continue;
            };

            let replacement = if m.distance == 0 {
                let separator = if m.adjectival {
                    "-"
                } else if unit == rules::CELSIUS {
                    ""
                } else {
                    " "
                };
                let replacement = format!("{value}{separator}{unit_text}");
                edits.push((m.position, m.end, replacement.clone()));
                replacement
            } else {
                edits.push((m.position, m.number_end, value.clone()));
                edits.push((m.unit_start, m.end, unit_text.to_string()));
                format!("{value}{}{unit_text}", &text[m.number_end..m.unit_start])
            };

            changes.push(Change {
                kind: ChangeKind::Unit,
                original: text[m.position..m.end].to_string(),
                replacement,
            });
        }

        let mut result = text.to_string();
        edits.sort_by(|a, b| b.0.cmp(&a.0));
        for (start, end, replacement) in edits {
            result.replace_range(start..end, &replacement);
        }

        (result, changes)
    }
}

fn leading_spaces(text: &str) -> usize {
    text.char_indices()
        .find(|(_, c)| !matches!(c, ' ' | '\t' | '\u{00A0}'))
        .map_or(text.len(), |(i, _)| i)
}
