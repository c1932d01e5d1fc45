use super::tokenizer::{self, match_case, Word};
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// Default number of words inspected either side of a contextual word
pub const DEFAULT_WINDOW: usize = 3;

/// A word whose British spelling depends on its sense
#[derive(Debug, Clone)]
pub struct ContextualWord {
    pub word: String,
    pub replacement: String,
    /// Any match leaves the occurrence unconverted
    pub exclude_patterns: Vec<Regex>,
    /// When non-empty, one of these must match before converting
    pub require_patterns: Vec<Regex>,
    pub priority: i32,
}

impl ContextualWord {
    pub fn new(
        word: &str,
        replacement: &str,
        exclude: &[&str],
        require: &[&str],
        priority: i32,
    ) -> Result<Self> {
        Ok(Self {
            word: word.to_lowercase(),
            replacement: replacement.to_string(),
            exclude_patterns: compile(exclude)?,
            require_patterns: compile(require)?,
            priority,
        })
    }

    fn applies_to(&self, window: &str) -> bool {
        if self.exclude_patterns.iter().any(|re| re.is_match(window)) {
            return false;
        }
        self.require_patterns.is_empty() || self.require_patterns.iter().any(|re| re.is_match(window))
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|source| Error::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
        })
        .collect()
}

const COMPUTING: &str = r"\b(computer|computers|software|code|coding|compiled?|compiler|execut\w*|run|runs|running|ran|install\w*|binary|debug\w*|source|script|app|application|launch\w*|crash\w*|exit\w*|kernel|process|function|write|wrote|written|output|input|memory|python|rust|java|c\+\+)\b";

const BANKING: &str = r"\b(bank|banks|cash\w*|deposit\w*|pay|paid|payable|payment|wrote|write|writing|signed?|bounced?|blank|account|traveller'?s|traveler'?s)\b";

const BUILDING: &str = r"\b(building|buildings|floor|floors|tall|house|tower|ground|upper|lower|top|(\d+|one|two|three|four|five|six|seven|eight|nine|ten|multi|single)[-\s]stor(y|ies))\b";

const NARRATIVE: &str = r"\b(tell|tells|told|telling|read|reading|short|love|news|bedtime|true|success|cover|back|user|whole|same|origin)\b";

// (word, replacement, exclude, require, priority)
type RuleSpec = (&'static str, &'static str, &'static [&'static str], &'static [&'static str], i32);

const BUILTIN_RULES: &[RuleSpec] = &[
    ("program", "programme", &[COMPUTING], &[], 10),
    ("programs", "programmes", &[COMPUTING], &[], 10),
    (
        "check",
        "cheque",
        &[r"\bcheck\s+(the|your|my|our|if|whether|that|this|it|out|in|for|on|off|up)\b", r"\b(spell|health|security|sanity|type|null|bounds|reality|double|background|rain|fact)\s+check\b"],
        &[BANKING],
        5,
    ),
    (
        "checks",
        "cheques",
        &[r"\bchecks\s+(the|your|my|our|if|whether|that|this|it|out|in|for|on|off|up)\b", r"\b(spell|health|security|sanity|type|null|bounds|background|fact)\s+checks\b"],
        &[BANKING],
        5,
    ),
    (
        "tire",
        "tyre",
        &[r"\b(tire\s+of|never\s+tire|to\s+tire|(i|you|we|they|will|won't|don't|didn't)\s+tire)\b"],
        &[r"\b(car|cars|bike|bicycle|wheel|wheels|spare|flat|rubber|tread|truck|vehicle|pressure|front|rear|new|worn|puncture\w*|change|changed|changing|winter|snow)\b"],
        5,
    ),
    (
        "tires",
        "tyres",
        &[r"\b(tires\s+of|never\s+tires|(he|she|it|who)\s+tires)\b"],
        &[r"\b(car|cars|bike|bicycle|wheel|wheels|spare|flat|rubber|tread|truck|vehicle|pressure|front|rear|worn|new|four|winter|snow)\b"],
        5,
    ),
    (
        "curb",
        "kerb",
        &[r"\bcurb\s+(the|his|her|their|its|our|your|my|spending|inflation|enthusiasm|appetite|demand|emissions|costs)\b"],
        &[r"\b(road|street|sidewalk|pavement|park\w*|pulled|drove|car|stepped|step|edge|stone|side|off)\b"],
        5,
    ),
    (
        "meter",
        "metre",
        &[r"\b(parking|gas|water|electric\w*|smart|light|postage|taxi|flow|volt|ohm|speed|pressure|exposure)\s+meter\b", r"\bmeter\s+(reading|readings|reader|box|maid)\b"],
        &[],
        5,
    ),
    (
        "meters",
        "metres",
        &[r"\b(parking|gas|water|electric\w*|smart|light|postage|taxi|flow|volt|ohm|speed|pressure|exposure)\s+meters\b", r"\bmeters\s+(reading|readings|reader|box)\b"],
        &[],
        5,
    ),
    ("story", "storey", &[NARRATIVE], &[BUILDING], 5),
    ("stories", "storeys", &[NARRATIVE], &[BUILDING], 5),
    (
        "draft",
        "draught",
        &[r"\b(first|final|rough|early|initial|write|wrote|written|email|document|version|pick|picks|bill|plan|pull|request|saved)\b"],
        &[r"\b(beer|ale|pint|cold|chilly|air|window|door|excluder|horse|animal)\b"],
        5,
    ),
    (
        "practice",
        "practise",
        &[r"\bpractice\s+(session|sessions|test|tests|exam|exams|manager|area|room|run|makes)\b"],
        &[r"\b(to|will|must|should|can|could|would|you|we|they|i|let's|always|often|never|please|don't|didn't)\s+practice\b"],
        5,
    ),
    (
        "license",
        "licence",
        &[r"\b(to|will|must|may|might|can|could|would|shall|should|not|we|they|i|you)\s+license\b", r"\blicense\s+(the|it|them|this|that|our|their|its|his|her)\b"],
        &[],
        5,
    ),
    (
        "licenses",
        "licences",
        &[r"\b(he|she|it|who|which)\s+licenses\b", r"\blicenses\s+(the|it|them|this|that|our|their|its|his|her)\b"],
        &[],
        5,
    ),
];

lazy_static! {
    static ref BUILTIN: Vec<ContextualWord> = BUILTIN_RULES
        .iter()
        .map(|(word, replacement, exclude, require, priority)| {
            ContextualWord::new(word, replacement, exclude, require, *priority)
                .expect("built-in contextual patterns are valid")
        })
        .collect();
}

/// Outcome of checking one word against the contextual rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Not a contextual word; the plain dictionary may handle it
    NotContextual,
    /// Contextual word whose context rules out converting
    Keep,
    Replace(String),
}

#[derive(Debug, Clone)]
pub struct ContextualDetector {
    rules: BTreeMap<String, Vec<ContextualWord>>,
    window: usize,
}

impl Default for ContextualDetector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl ContextualDetector {
    pub fn new(window: usize) -> Self {
        Self::with_rules(BUILTIN.iter().cloned(), window)
    }

    pub fn with_rules<I>(rules: I, window: usize) -> Self
    where
        I: IntoIterator<Item = ContextualWord>,
    {
        let mut by_word: BTreeMap<String, Vec<ContextualWord>> = BTreeMap::new();
        for rule in rules {
            by_word.entry(rule.word.clone()).or_default().push(rule);
        }
        for rules in by_word.values_mut() {
            rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        Self {
            rules: by_word,
            window,
        }
    }

    pub fn is_contextual(&self, word: &str) -> bool {
        self.rules.contains_key(&word.to_lowercase())
    }

    /// Every contextual headword, sorted
    pub fn supported_words(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    /// Decide how `word`, found inside `text`, should be spelled
    pub fn resolve(&self, text: &str, word: &Word<'_>) -> Resolution {
        let words = tokenizer::words(text);
        match words.binary_search_by_key(&word.start, |w| w.start) {
            Ok(index) => self.resolve_at(text, &words, index),
            Err(_) => Resolution::NotContextual,
        }
    }

    /// Same as [`resolve`](Self::resolve) for `words[index]`, where `words`
    /// was scanned from `text` once up front
    pub fn resolve_at(&self, text: &str, words: &[Word<'_>], index: usize) -> Resolution {
        let Some(word) = words.get(index) else {
            return Resolution::NotContextual;
        };
        let Some(rules) = self.rules.get(&word.text.to_lowercase()) else {
            return Resolution::NotContextual;
        };
        let Some((start, end)) = tokenizer::window(words, index, self.window) else {
            return Resolution::NotContextual;
        };
        let window = &text[start..end];

        rules
            .iter()
            .find(|rule| rule.applies_to(window))
            .map_or(Resolution::Keep, |rule| {
                Resolution::Replace(match_case(word.text, &rule.replacement))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::tokenizer::words;

    fn resolve_first(detector: &ContextualDetector, text: &str, target: &str) -> Resolution {
        let word = words(text)
            .into_iter()
            .find(|w| w.text.eq_ignore_ascii_case(target))
            .unwrap();
        detector.resolve(text, &word)
    }

    #[test]
    fn test_programme_outside_computing() {
        let detector = ContextualDetector::default();
        assert_eq!(
            resolve_first(&detector, "We watched a television program last night", "program"),
            Resolution::Replace("programme".to_string())
        );
        assert_eq!(
            resolve_first(&detector, "Run the program with debug flags", "program"),
            Resolution::Keep
        );
        assert_eq!(
            resolve_first(&detector, "a computer program", "program"),
            Resolution::Keep
        );
    }

    #[test]
    fn test_required_context() {
        let detector = ContextualDetector::default();
        assert_eq!(
            resolve_first(&detector, "She wrote a check to the bank", "check"),
            Resolution::Replace("cheque".to_string())
        );
        assert_eq!(
            resolve_first(&detector, "Please check the results", "check"),
            Resolution::Keep
        );
        assert_eq!(
            resolve_first(&detector, "The car needs a new tire", "tire"),
            Resolution::Replace("tyre".to_string())
        );
        assert_eq!(
            resolve_first(&detector, "I never tire of this", "tire"),
            Resolution::Keep
        );
    }

    #[test]
    fn test_device_meter_is_kept() {
        let detector = ContextualDetector::default();
        assert_eq!(
            resolve_first(&detector, "The parking meter was broken", "meter"),
            Resolution::Keep
        );
        assert_eq!(
            resolve_first(&detector, "Each meter of cable", "meter"),
            Resolution::Replace("metre".to_string())
        );
    }

    #[test]
    fn test_case_is_preserved() {
        let detector = ContextualDetector::default();
        assert_eq!(
            resolve_first(&detector, "Program guide for the festival", "Program"),
            Resolution::Replace("Programme".to_string())
        );
    }

    #[test]
    fn test_non_contextual_words() {
        let detector = ContextualDetector::default();
        assert_eq!(
            resolve_first(&detector, "the color red", "color"),
            Resolution::NotContextual
        );
        assert!(detector.is_contextual("PROGRAM"));
        assert!(detector.supported_words().contains(&"license".to_string()));
    }

    #[test]
    fn test_priority_orders_rules() {
        let low = ContextualWord::new("draft", "draught", &[], &[], 1).unwrap();
        let high = ContextualWord::new("draft", "DRAFT-HIGH", &[], &[], 9).unwrap();
        let detector = ContextualDetector::with_rules([low, high], 3);
        assert_eq!(
            resolve_first(&detector, "a draft", "draft"),
            Resolution::Replace("draft-high".to_string())
        );
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = ContextualWord::new("x", "y", &["(unclosed"], &[], 0).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
