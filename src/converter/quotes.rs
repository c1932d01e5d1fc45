// Quote normalisation between typographic and straight forms

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Curly, low-9 and prime variants become `'` and `"`
    #[default]
    Straight,
    /// Straight quotes become curly, opening or closing by position
    Smart,
}

const SINGLE_VARIANTS: &[char] = &['\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}', '\u{2032}'];
const DOUBLE_VARIANTS: &[char] = &['\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}', '\u{2033}'];

/// Rewrite quotes in `text`, returning the result and how many quotes changed
pub fn normalise_quotes(text: &str, style: QuoteStyle) -> (String, usize) {
    match style {
        QuoteStyle::Straight => to_straight(text),
        QuoteStyle::Smart => to_smart(text),
    }
}

fn to_straight(text: &str) -> (String, usize) {
    let mut changes = 0;
    let out = text
        .chars()
        .map(|ch| {
            if SINGLE_VARIANTS.contains(&ch) {
                changes += 1;
                '\''
            } else if DOUBLE_VARIANTS.contains(&ch) {
                changes += 1;
                '"'
            } else {
                ch
            }
        })
        .collect();
    (out, changes)
}

fn opens_quote(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | '{' | '\u{2014}' | '\u{2013}'),
    }
}

fn to_smart(text: &str) -> (String, usize) {
    let mut changes = 0;
    let mut out = String::with_capacity(text.len());
    let mut prev = None;

    for ch in text.chars() {
        let mapped = match ch {
            '"' => Some(if opens_quote(prev) { '\u{201C}' } else { '\u{201D}' }),
            '\'' => Some(if opens_quote(prev) { '\u{2018}' } else { '\u{2019}' }),
            _ => None,
        };
        match mapped {
            Some(smart) => {
                changes += 1;
                out.push(smart);
            }
            None => out.push(ch),
        }
        prev = Some(ch);
    }

    (out, changes)
}
