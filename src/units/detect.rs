// Lexical scanning for numbers, imperial unit tokens and idioms

use super::UnitType;
use aho_corasick::{AhoCorasick, Anchored, Input, MatchKind, StartKind};
use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certainty {
    /// Unambiguous full names and abbreviations ("feet", "lbs")
    Exact,
    /// Tokens that are also ordinary words or letters ("in", "F", "mi")
    Fuzzy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceUnit {
    pub name: &'static str,
    pub unit_type: UnitType,
    /// Multiplier into the type's base unit (mm, g, ml, m²); unused for temperature
    pub to_base: f64,
}

const fn unit(name: &'static str, unit_type: UnitType, to_base: f64) -> SourceUnit {
    SourceUnit {
        name,
        unit_type,
        to_base,
    }
}

pub const SOURCE_UNITS: &[SourceUnit] = &[
    unit("inch", UnitType::Length, 25.4),
    unit("foot", UnitType::Length, 304.8),
    unit("yard", UnitType::Length, 914.4),
    unit("mile", UnitType::Length, 1_609_344.0),
    unit("ounce", UnitType::Mass, 28.349_523_125),
    unit("pound", UnitType::Mass, 453.592_37),
    unit("ton", UnitType::Mass, 907_184.74),
    unit("teaspoon", UnitType::Volume, 4.928_921_593_75),
    unit("tablespoon", UnitType::Volume, 14.786_764_781_25),
    unit("fluid ounce", UnitType::Volume, 29.573_529_562_5),
    unit("cup", UnitType::Volume, 236.588_236_5),
    unit("pint", UnitType::Volume, 473.176_473),
    unit("quart", UnitType::Volume, 946.352_946),
    unit("gallon", UnitType::Volume, 3_785.411_784),
    unit("fahrenheit", UnitType::Temperature, 1.0),
    unit("square inch", UnitType::Area, 0.000_645_16),
    unit("square foot", UnitType::Area, 0.092_903_04),
    unit("square yard", UnitType::Area, 0.836_127_36),
    unit("acre", UnitType::Area, 4_046.856_422_4),
    unit("square mile", UnitType::Area, 2_589_988.110_336),
];

use Certainty::{Exact, Fuzzy};

const ALIASES: &[(&str, &str, Certainty)] = &[
    ("inch", "inch", Exact),
    ("inches", "inch", Exact),
    ("in", "inch", Fuzzy),
    ("foot", "foot", Exact),
    ("feet", "foot", Exact),
    ("ft", "foot", Exact),
    ("yard", "yard", Exact),
    ("yards", "yard", Exact),
    ("yd", "yard", Exact),
    ("yds", "yard", Exact),
    ("mile", "mile", Exact),
    ("miles", "mile", Exact),
    ("mi", "mile", Fuzzy),
    ("ounce", "ounce", Exact),
    ("ounces", "ounce", Exact),
    ("oz", "ounce", Exact),
    ("pound", "pound", Exact),
    ("pounds", "pound", Exact),
    ("lb", "pound", Exact),
    ("lbs", "pound", Exact),
    ("ton", "ton", Exact),
    ("tons", "ton", Exact),
    ("teaspoon", "teaspoon", Exact),
    ("teaspoons", "teaspoon", Exact),
    ("tsp", "teaspoon", Exact),
    ("tablespoon", "tablespoon", Exact),
    ("tablespoons", "tablespoon", Exact),
    ("tbsp", "tablespoon", Exact),
    ("fluid ounce", "fluid ounce", Exact),
    ("fluid ounces", "fluid ounce", Exact),
    ("fl oz", "fluid ounce", Exact),
    ("fl. oz", "fluid ounce", Exact),
    ("cup", "cup", Exact),
    ("cups", "cup", Exact),
    ("pint", "pint", Exact),
    ("pints", "pint", Exact),
    ("quart", "quart", Exact),
    ("quarts", "quart", Exact),
    ("qt", "quart", Exact),
    ("gallon", "gallon", Exact),
    ("gallons", "gallon", Exact),
    ("gal", "gallon", Exact),
    ("°F", "fahrenheit", Exact),
    ("ºF", "fahrenheit", Exact),
    ("° F", "fahrenheit", Exact),
    ("degrees Fahrenheit", "fahrenheit", Exact),
    ("degree Fahrenheit", "fahrenheit", Exact),
    ("degrees F", "fahrenheit", Exact),
    ("deg F", "fahrenheit", Exact),
    ("Fahrenheit", "fahrenheit", Exact),
    ("F", "fahrenheit", Fuzzy),
    ("square inch", "square inch", Exact),
    ("square inches", "square inch", Exact),
    ("sq in", "square inch", Exact),
    ("sq. in", "square inch", Exact),
    ("in²", "square inch", Exact),
    ("square foot", "square foot", Exact),
    ("square feet", "square foot", Exact),
    ("sq ft", "square foot", Exact),
    ("sq. ft", "square foot", Exact),
    ("sqft", "square foot", Exact),
    ("ft²", "square foot", Exact),
    ("square yard", "square yard", Exact),
    ("square yards", "square yard", Exact),
    ("sq yd", "square yard", Exact),
    ("acre", "acre", Exact),
    ("acres", "acre", Exact),
    ("square mile", "square mile", Exact),
    ("square miles", "square mile", Exact),
    ("sq mi", "square mile", Exact),
];

/// Idioms that contain a unit word but are not measurements
pub const BUILTIN_IDIOMS: &[&str] = &[
    "miles away",
    "miles apart",
    "miles ahead",
    "miles from anywhere",
    "go the extra mile",
    "extra mile",
    "a mile a minute",
    "cold feet",
    "feet wet",
    "feet first",
    "on my feet",
    "on your feet",
    "on his feet",
    "on her feet",
    "on their feet",
    "on our feet",
    "two left feet",
    "six feet under",
    "tons of",
    "a ton of",
    "ton of bricks",
    "inch by inch",
    "every inch",
    "give an inch",
    "within an inch",
    "pound of flesh",
    "pound for pound",
    "foot the bill",
    "put your foot down",
    "best foot forward",
    "one foot in the grave",
    "foot in the door",
    "ten-foot pole",
    "10-foot pole",
    "hundred miles",
];

/// Words that may sit between a number and its unit: "3 more miles"
const MEASURE_MODIFIERS: &[&str] = &[
    "more",
    "less",
    "fewer",
    "extra",
    "additional",
    "further",
    "whole",
    "full",
    "entire",
    "solid",
    "good",
    "long",
    "hard",
    "short",
];

pub fn is_measure_modifier(word: &str) -> bool {
    MEASURE_MODIFIERS.iter().any(|m| m.eq_ignore_ascii_case(word))
}

lazy_static! {
    static ref UNIT_MATCHER: AhoCorasick = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .start_kind(StartKind::Anchored)
        .build(ALIASES.iter().map(|(alias, _, _)| alias))
        .unwrap();
}

pub fn source_unit(name: &str) -> Option<&'static SourceUnit> {
    SOURCE_UNITS.iter().find(|u| u.name.eq_ignore_ascii_case(name))
}

/// Canonical unit a name or alias refers to
pub fn resolve_alias(name: &str) -> Option<&'static SourceUnit> {
    ALIASES
        .iter()
        .find(|(alias, _, _)| alias.eq_ignore_ascii_case(name))
        .and_then(|(_, canonical, _)| source_unit(canonical))
        .or_else(|| source_unit(name))
}

#[derive(Debug, Clone, Copy)]
pub struct UnitToken {
    pub start: usize,
    pub end: usize,
    pub unit: &'static SourceUnit,
    pub certainty: Certainty,
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Unit token starting exactly at `pos`, if any
pub fn unit_at(text: &str, pos: usize) -> Option<UnitToken> {
    if pos >= text.len() {
        return None;
    }

    let found = UNIT_MATCHER.find(Input::new(text).range(pos..).anchored(Anchored::Yes))?;
    let ends_in_word = text[found.start()..found.end()]
        .chars()
        .next_back()
        .is_some_and(is_word_char);
    let followed_by_word = text[found.end()..].chars().next().is_some_and(is_word_char);
    if ends_in_word && followed_by_word {
        return None;
    }

    let (_, canonical, certainty) = ALIASES[found.pattern().as_usize()];
    Some(UnitToken {
        start: found.start(),
        end: found.end(),
        unit: source_unit(canonical)?,
        certainty,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberToken {
    pub start: usize,
    pub end: usize,
    pub value: f64,
    pub written: bool,
}

fn skip_numeric_run(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        let b = bytes[i];
        let joins_digits = matches!(b, b'.' | b',' | b'/' | b':')
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if b.is_ascii_digit() || joins_digits {
            i += 1;
        } else {
            break;
        }
    }
    i
}

fn digit_run(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

/// Numeric literals: `12`, `-40`, `1,000`, `0.25`, `1/2`, `1 1/2`.
///
/// Digits glued to identifiers, version strings, ranges, times and dates are
/// skipped entirely.
pub fn scan_digits(text: &str) -> Vec<NumberToken> {
    let bytes = text.as_bytes();
    let mut tokens: Vec<NumberToken> = Vec::new();
    let mut last_integer: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let mut start = i;
        let mut sign = 1.0;
        match text[..i].chars().next_back() {
            Some(c) if is_word_char(c) || c == '.' || c == ',' => {
                i = skip_numeric_run(bytes, i);
                continue;
            }
            Some(c @ ('-' | '+' | '\u{2212}')) => {
                let sign_start = i - c.len_utf8();
                match text[..sign_start].chars().next_back() {
                    Some(b) if is_word_char(b) => {
                        i = skip_numeric_run(bytes, i);
                        continue;
                    }
                    _ => {
                        start = sign_start;
                        if c != '+' {
                            sign = -1.0;
                        }
                    }
                }
            }
            _ => {}
        }

        let mut end = digit_run(bytes, i);
        while bytes.get(end) == Some(&b',')
            && digit_run(bytes, end + 1) == end + 4
        {
            end += 4;
        }

        let mut is_integer = true;
        if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
            end = digit_run(bytes, end + 1);
            is_integer = false;
        }

        let literal: String = text[i..end].chars().filter(|&c| c != ',').collect();
        let Ok(mut value) = literal.parse::<f64>() else {
            i = skip_numeric_run(bytes, end);
            continue;
        };

        let mut is_fraction = false;
        if is_integer && bytes.get(end) == Some(&b'/') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
            let denom_end = digit_run(bytes, end + 1);
            let denominator: f64 = text[end + 1..denom_end].parse().unwrap_or(0.0);
            if denominator == 0.0 || bytes.get(denom_end) == Some(&b'/') {
                i = skip_numeric_run(bytes, denom_end);
                continue;
            }
            value /= denominator;
            end = denom_end;
            is_fraction = true;
            is_integer = false;
        }

        let trailing = &bytes[end..];
        let continues = matches!(trailing.first(), Some(b'-' | b'.' | b':' | b'/'))
            && trailing.get(1).is_some_and(u8::is_ascii_digit);
        if continues {
            i = skip_numeric_run(bytes, end);
            continue;
        }

        value *= sign;

        // "1 1/2" folds into the preceding whole number
        let mixed = is_fraction
            && sign > 0.0
            && last_integer.is_some_and(|idx| tokens[idx].end + 1 == start)
            && bytes[start - 1] == b' ';
        match (mixed, last_integer) {
            (true, Some(idx)) => {
                let whole = &mut tokens[idx];
                whole.value += value.copysign(whole.value);
                whole.end = end;
                last_integer = None;
            }
            _ => {
                tokens.push(NumberToken {
                    start,
                    end,
                    value,
                    written: false,
                });
                last_integer = is_integer.then_some(tokens.len() - 1);
            }
        }

        i = end;
    }

    tokens
}

const ONES: &[(&str, f64)] = &[
    ("zero", 0.0),
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("thirteen", 13.0),
    ("fourteen", 14.0),
    ("fifteen", 15.0),
    ("sixteen", 16.0),
    ("seventeen", 17.0),
    ("eighteen", 18.0),
    ("nineteen", 19.0),
];

const TENS: &[(&str, f64)] = &[
    ("twenty", 20.0),
    ("thirty", 30.0),
    ("forty", 40.0),
    ("fifty", 50.0),
    ("sixty", 60.0),
    ("seventy", 70.0),
    ("eighty", 80.0),
    ("ninety", 90.0),
];

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|(_, v)| *v)
}

pub fn written_value(word: &str) -> Option<f64> {
    lookup(ONES, word).or_else(|| lookup(TENS, word))
}

/// Written numbers: `six`, `twelve`, `twenty-five`
pub fn scan_written(text: &str) -> Vec<NumberToken> {
    let words = crate::converter::tokenizer::words(text);
    let mut tokens = Vec::new();
    let mut skip_next = false;

    for (idx, word) in words.iter().enumerate() {
        if std::mem::take(&mut skip_next) {
            continue;
        }
        if let Some(tens) = lookup(TENS, word.text) {
            let unit = words.get(idx + 1).filter(|next| {
                next.start == word.end + 1 && &text[word.end..next.start] == "-"
            });
            if let Some(ones) = unit.and_then(|next| lookup(&ONES[1..10], next.text)) {
                let next = unit.map_or(word.end, |n| n.end);
                tokens.push(NumberToken {
                    start: word.start,
                    end: next,
                    value: tens + ones,
                    written: true,
                });
                skip_next = true;
                continue;
            }
        }
        if let Some(value) = written_value(word.text) {
            tokens.push(NumberToken {
                start: word.start,
                end: word.end,
                value,
                written: true,
            });
        }
    }

    tokens
}

/// All numbers in text order
pub fn scan_numbers(text: &str, written: bool) -> Vec<NumberToken> {
    let mut tokens = scan_digits(text);
    if written {
        tokens.extend(scan_written(text));
        tokens.sort_by_key(|t| t.start);
    }
    tokens
}

/// Build an idiom matcher from built-ins plus extra phrases
pub fn idiom_matcher(extra: &[String]) -> Result<AhoCorasick, aho_corasick::BuildError> {
    let patterns: Vec<String> = BUILTIN_IDIOMS
        .iter()
        .map(|s| s.to_string())
        .chain(extra.iter().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect();

    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(patterns)
}

/// Byte ranges of whole-word idiom occurrences
pub fn idiom_ranges(matcher: &AhoCorasick, text: &str) -> Vec<(usize, usize)> {
    matcher
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// How the unit token is attached to its number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    Attached,
    Hyphen,
    Spaced,
}

const UNIT_WEIGHT: f64 = 0.6;
const DISTANCE_WEIGHT: f64 = 0.25;
const CONTEXT_WEIGHT: f64 = 0.15;

/// Score a number/unit pairing in `[0, 1]`
pub fn confidence(certainty: Certainty, gap: Gap, distance: usize, prefix: Option<char>) -> f64 {
    let unit_score = match (certainty, gap) {
        (Certainty::Exact, _) => 1.0,
        (Certainty::Fuzzy, Gap::Attached) => 0.8,
        (Certainty::Fuzzy, Gap::Hyphen) => 0.6,
        (Certainty::Fuzzy, Gap::Spaced) => 0.1,
    };
    let distance_score = (1.0 - distance as f64 / 2.0).max(0.0);
    let context_score = match prefix {
        Some('$' | '£' | '€' | '#' | '@' | '^') => 0.0,
        _ => 1.0,
    };

    UNIT_WEIGHT * unit_score + DISTANCE_WEIGHT * distance_score + CONTEXT_WEIGHT * context_score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(text: &str) -> Vec<f64> {
        scan_digits(text).iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_number_scanning() {
        assert_eq!(values("12 feet and 0.25 inches"), vec![12.0, 0.25]);
        assert_eq!(values("a 1,500 mile trip"), vec![1500.0]);
        assert_eq!(values("it was -40 outside"), vec![-40.0]);
        assert_eq!(values("use 1/2 cup"), vec![0.5]);
        assert_eq!(values("add 1 1/2 cups"), vec![1.5]);
    }

    #[test]
    fn test_non_measurement_numbers_are_skipped() {
        assert!(values("version 1.2.3").is_empty());
        assert!(values("utf8 and x86 and 0x5F").iter().all(|v| *v == 0.0));
        assert!(values("open 9-5 daily").is_empty());
        assert!(values("at 10:30").is_empty());
        assert!(values("on 3/4/2024").is_empty());
    }

    #[test]
    fn test_offsets_cover_sign() {
        let tokens = scan_digits("drop to -40");
        assert_eq!(tokens[0].start, 8);
        assert_eq!(tokens[0].end, 11);
    }

    #[test]
    fn test_written_numbers() {
        let tokens = scan_written("six feet and twenty-five miles");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, 6.0);
        assert_eq!(tokens[1].value, 25.0);
        assert_eq!(&"six feet and twenty-five miles"[tokens[1].start..tokens[1].end], "twenty-five");
    }

    #[test]
    fn test_unit_matching() {
        let text = "12 feet";
        let token = unit_at(text, 3).unwrap();
        assert_eq!(token.unit.name, "foot");
        assert_eq!(token.end, 7);

        let token = unit_at("500 Square Feet", 4).unwrap();
        assert_eq!(token.unit.name, "square foot");

        assert!(unit_at("5 inside", 2).is_none());
        assert_eq!(unit_at("5 in the box", 2).unwrap().certainty, Certainty::Fuzzy);
        assert_eq!(unit_at("32°F", 2).unwrap().unit.unit_type, UnitType::Temperature);
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(resolve_alias("ft").unwrap().name, "foot");
        assert_eq!(resolve_alias("Feet").unwrap().name, "foot");
        assert_eq!(resolve_alias("acre").unwrap().name, "acre");
        assert!(resolve_alias("furlong").is_none());
    }

    #[test]
    fn test_idioms_require_word_boundaries() {
        let matcher = idiom_matcher(&[]).unwrap();
        assert_eq!(idiom_ranges(&matcher, "I'm miles away").len(), 1);
        assert!(idiom_ranges(&matcher, "buttons of fun").is_empty());
    }

    #[test]
    fn test_confidence_ordering() {
        let exact = confidence(Certainty::Exact, Gap::Spaced, 0, None);
        let far = confidence(Certainty::Exact, Gap::Spaced, 2, None);
        let fuzzy_spaced = confidence(Certainty::Fuzzy, Gap::Spaced, 0, None);
        let fuzzy_glued = confidence(Certainty::Fuzzy, Gap::Attached, 0, None);

        assert!((exact - 1.0).abs() < 1e-9);
        assert!(far < exact && far > 0.5);
        assert!(fuzzy_spaced < 0.5);
        assert!(fuzzy_glued > 0.5);
    }
}
