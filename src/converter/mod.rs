pub mod builtin;
pub mod contextual;
pub mod dictionary;
pub mod quotes;
pub mod tokenizer;

use crate::parser::{self, Edit, Span, SpanKind};
use crate::units::{UnitConfig, UnitConverter};
use crate::{Change, ChangeKind, ChangeStats, Config, Conversion, Result};
use contextual::{ContextualDetector, Resolution};
use dictionary::{Dictionary, Direction};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use quotes::QuoteStyle;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    // Words inside these are never respelled
    static ref PROTECTED: Regex = Regex::new(
        r"https?://\S+|www\.\S+|[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}|\b[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*\.[a-z]{2,}\b(?:/\S*)?"
    )
    .unwrap();
}

/// Per-call pipeline switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub normalise_quotes: bool,
    pub quote_style: QuoteStyle,
    pub convert_units: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            normalise_quotes: true,
            quote_style: QuoteStyle::Straight,
            convert_units: false,
        }
    }
}

/// American -> British conversion engine.
///
/// Tables are fixed at construction. The only mutable setting is the unit
/// toggle, which takes `&mut self`; share an engine behind an `RwLock` if it
/// must be toggled while in use, or pass [`ConvertOptions`] per call instead.
#[derive(Debug, Clone)]
pub struct Converter {
    dictionary: Dictionary,
    contextual: ContextualDetector,
    units: UnitConverter,
    unit_conversion: bool,
    quote_style: QuoteStyle,
}

impl Converter {
    pub fn new(config: &Config, unit_config: UnitConfig) -> Self {
        if let Some(path) = &config.user_dictionary {
            if let Err(e) = crate::dict::manager::ensure_user_dictionary(path) {
                warn!("Could not create user dictionary {}: {:#}", path.display(), e);
            }
        }

        let dictionary = Dictionary::load(config.user_dictionary.as_deref());
        let contextual = ContextualDetector::new(config.context_window);
        let unit_conversion = config.units || unit_config.enabled;
        let units = UnitConverter::new(unit_config);

        let mut converter = Self::with_parts(dictionary, contextual, units);
        converter.unit_conversion = unit_conversion;
        if config.smart_quotes {
            converter.quote_style = QuoteStyle::Smart;
        }

        info!(
            "Converter ready: {} dictionary entries, {} contextual words, units {}",
            converter.dictionary.len(),
            converter.contextual.supported_words().len(),
            if converter.unit_conversion { "on" } else { "off" }
        );
        converter
    }

    pub fn with_parts(
        dictionary: Dictionary,
        contextual: ContextualDetector,
        units: UnitConverter,
    ) -> Self {
        Self {
            unit_conversion: units.config().enabled,
            dictionary,
            contextual,
            units,
            quote_style: QuoteStyle::Straight,
        }
    }

    pub fn set_unit_conversion(&mut self, enabled: bool) {
        self.unit_conversion = enabled;
    }

    pub fn unit_conversion_enabled(&self) -> bool {
        self.unit_conversion
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn units(&self) -> &UnitConverter {
        &self.units
    }

    pub fn supported_contextual_words(&self) -> Vec<String> {
        self.contextual.supported_words()
    }

    /// Options matching the engine's own settings
    pub fn options(&self, normalise_quotes: bool) -> ConvertOptions {
        ConvertOptions {
            normalise_quotes,
            quote_style: self.quote_style,
            convert_units: self.unit_conversion,
        }
    }

    /// Convert `text` as a single prose span
    pub fn convert_to_british(&self, text: &str, normalise_quotes: bool) -> Conversion {
        self.convert_with(text, &self.options(normalise_quotes))
    }

    /// Quotes, then spelling, then units
    pub fn convert_with(&self, text: &str, options: &ConvertOptions) -> Conversion {
        let mut stats = ChangeStats {
            total_words: tokenizer::count_words(text),
            ..Default::default()
        };
        let mut changes = Vec::new();

        let mut current = if options.normalise_quotes {
            let (normalised, count) = quotes::normalise_quotes(text, options.quote_style);
            stats.quote_changes = count;
            if count > 0 {
                changes.extend(quote_changes(text, &normalised));
            }
            normalised
        } else {
            text.to_string()
        };

        let (respelled, spelling) = self.respell(&current);
        stats.spelling_changes = spelling.len();
        changes.extend(spelling);
        current = respelled;

        if options.convert_units {
            let (converted, unit_changes) = self.units.convert(&current);
            stats.unit_conversions = unit_changes.len();
            changes.extend(unit_changes);
            current = converted;
        }

        Conversion {
            text: current,
            stats,
            changes,
        }
    }

    /// Convert only comments and prose, leaving code and strings intact
    pub fn process_code_aware(
        &self,
        text: &str,
        hint: Option<&str>,
        normalise_quotes: bool,
    ) -> Result<Conversion> {
        let options = self.options(normalise_quotes);
        let mut stats = ChangeStats::default();
        let mut changes = Vec::new();
        let mut edits = Vec::new();

        for span in parser::extract_comments(text, hint) {
            let conversion = self.convert_with(&span.content, &options);
            stats += conversion.stats;
            if conversion.is_unchanged() {
                continue;
            }

            debug!(
                "{:?} {}..{}: {} changes",
                span.kind,
                span.start,
                span.end,
                conversion.changes.len()
            );
            edits.push(Edit {
                start: span.start,
                end: span.end,
                replacement: rebuild(text, &span, &conversion.text),
            });
            changes.extend(conversion.changes);
        }

        Ok(Conversion {
            text: parser::splice(text, &edits)?,
            stats,
            changes,
        })
    }

    pub fn extract_comments(&self, text: &str, hint: Option<&str>) -> Vec<Span> {
        parser::extract_comments(text, hint)
    }

    fn respell(&self, text: &str) -> (String, Vec<Change>) {
        let protected: Vec<Range<usize>> = PROTECTED.find_iter(text).map(|m| m.range()).collect();
        let use_contextual = self.dictionary.direction() == Direction::AmericanToBritish;

        let mut result = String::with_capacity(text.len());
        let mut changes = Vec::new();
        let mut cursor = 0;
        let mut guard = protected.iter().peekable();

        let words = tokenizer::words(text);
        for (index, word) in words.iter().enumerate() {
            while guard.next_if(|r| r.end <= word.start).is_some() {}
            let shielded = guard.peek().is_some_and(|r| r.start < word.end);
            if !word.is_alphabetic() || shielded {
                continue;
            }

            let resolution = if use_contextual {
                self.contextual.resolve_at(text, &words, index)
            } else {
                Resolution::NotContextual
            };
            let replacement = match resolution {
                Resolution::Replace(replacement) => Some((replacement, ChangeKind::Contextual)),
                Resolution::Keep => None,
                Resolution::NotContextual => self
                    .dictionary
                    .lookup(word.text)
                    .map(|replacement| (replacement, ChangeKind::Spelling)),
            };

            let Some((replacement, kind)) = replacement else {
                continue;
            };
            if replacement == word.text {
                continue;
            }

            result.push_str(&text[cursor..word.start]);
            result.push_str(&replacement);
            cursor = word.end;
            changes.push(Change {
                kind,
                original: word.text.to_string(),
                replacement,
            });
        }
        result.push_str(&text[cursor..]);

        (result, changes)
    }
}

fn rebuild(text: &str, span: &Span, converted: &str) -> String {
    match span.kind {
        SpanKind::Prose => converted.to_string(),
        _ => parser::reattach(
            &text[span.start..span.end],
            &span.content,
            converted,
            span.prefix_len,
            span.suffix_len,
        ),
    }
}

// Quote normalisation maps characters one for one
fn quote_changes(before: &str, after: &str) -> Vec<Change> {
    before
        .chars()
        .zip(after.chars())
        .filter(|(a, b)| a != b)
        .map(|(a, b)| Change {
            kind: ChangeKind::Quote,
            original: a.to_string(),
            replacement: b.to_string(),
        })
        .collect()
}
