// Word scanning and case adaptation shared by the dictionary and contextual passes

use unicode_segmentation::UnicodeSegmentation;

/// A word borrowed from the scanned text, with its byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Word<'_> {
    /// Only purely alphabetic words are candidates for respelling;
    /// `color2` or `color_name` look like identifiers and are left alone.
    pub fn is_alphabetic(&self) -> bool {
        self.text.chars().all(char::is_alphabetic)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split text into maximal runs of word characters
pub fn words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut word_start = None;

    for (i, ch) in text.char_indices() {
        match (is_word_char(ch), word_start) {
            (true, None) => word_start = Some(i),
            (false, Some(start)) => {
                words.push(Word {
                    text: &text[start..i],
                    start,
                    end: i,
                });
                word_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = word_start {
        words.push(Word {
            text: &text[start..],
            start,
            end: text.len(),
        });
    }

    words
}

/// Count words the way a reader would, for statistics
pub fn count_words(text: &str) -> usize {
    text.unicode_words().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Lower,
    Capitalised,
    Upper,
}

pub fn casing(word: &str) -> Casing {
    let mut chars = word.chars().filter(|c| c.is_alphabetic());
    let Some(first) = chars.next() else {
        return Casing::Lower;
    };

    let rest: Vec<char> = chars.collect();
    if first.is_uppercase() && !rest.is_empty() && rest.iter().all(|c| c.is_uppercase()) {
        Casing::Upper
    } else if first.is_uppercase() {
        Casing::Capitalised
    } else {
        Casing::Lower
    }
}

/// Re-case `replacement` to follow the casing of `original`
pub fn match_case(original: &str, replacement: &str) -> String {
    match casing(original) {
        Casing::Upper => replacement.to_uppercase(),
        Casing::Capitalised => {
            let lower = replacement.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        Casing::Lower => replacement.to_lowercase(),
    }
}

/// Byte range covering `distance` words either side of `words[index]`
pub fn window(words: &[Word<'_>], index: usize, distance: usize) -> Option<(usize, usize)> {
    let last = words.len().checked_sub(1)?;
    if index > last {
        return None;
    }
    let first = &words[index.saturating_sub(distance)];
    let final_word = &words[(index + distance).min(last)];
    Some((first.start, final_word.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_scanning() {
        let found: Vec<_> = words("The color-blind user's color_name").iter().map(|w| w.text).collect();
        assert_eq!(found, vec!["The", "color", "blind", "user", "s", "color_name"]);
    }

    #[test]
    fn test_word_offsets() {
        let text = "  favor it";
        let found = words(text);
        assert_eq!(found[0].start, 2);
        assert_eq!(&text[found[0].start..found[0].end], "favor");
    }

    #[test]
    fn test_identifier_like_words_are_not_alphabetic() {
        let found = words("color2 color_name color");
        assert!(!found[0].is_alphabetic());
        assert!(!found[1].is_alphabetic());
        assert!(found[2].is_alphabetic());
    }

    #[test]
    fn test_case_matching() {
        assert_eq!(match_case("COLOR", "colour"), "COLOUR");
        assert_eq!(match_case("Color", "colour"), "Colour");
        assert_eq!(match_case("color", "colour"), "colour");
        // A single capital letter is capitalised, not all-caps
        assert_eq!(match_case("A", "b"), "B");
    }

    #[test]
    fn test_window() {
        let text = "one two three target four five six";
        let all = words(text);
        let (ws, we) = window(&all, 3, 2).unwrap();
        assert_eq!(&text[ws..we], "two three target four five");
        let (ws, we) = window(&all, 3, 0).unwrap();
        assert_eq!(&text[ws..we], "target");
    }

    #[test]
    fn test_window_clamps_at_edges() {
        let text = "target four";
        let all = words(text);
        let (ws, we) = window(&all, 0, 3).unwrap();
        assert_eq!(&text[ws..we], "target four");
        assert_eq!(window(&all, 2, 1), None);
        assert_eq!(window(&[], 0, 1), None);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("The quick, brown fox."), 4);
    }
}
