use super::builtin;
use super::tokenizer::match_case;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Which spelling a dictionary's keys are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    AmericanToBritish,
    BritishToAmerican,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::AmericanToBritish => Direction::BritishToAmerican,
            Direction::BritishToAmerican => Direction::AmericanToBritish,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub american: String,
    pub british: String,
}

/// Spelling lookup table keyed by lowercase source spelling
#[derive(Debug, Clone)]
pub struct Dictionary {
    direction: Direction,
    map: HashMap<String, String>,
}

impl Dictionary {
    /// The built-in American -> British table
    pub fn builtin() -> Self {
        Self::from_pairs(Direction::AmericanToBritish, builtin::pairs())
    }

    /// Built-ins merged with the user dictionary at `user_path`.
    ///
    /// A missing or malformed user file is logged and skipped.
    pub fn load(user_path: Option<&Path>) -> Self {
        let mut dictionary = Self::builtin();

        if let Some(path) = user_path {
            match crate::dict::manager::read_user_dictionary(path) {
                Ok(overrides) => {
                    info!(
                        "Loaded {} user dictionary entries from {}",
                        overrides.len(),
                        path.display()
                    );
                    dictionary.merge(overrides);
                }
                Err(e) => warn!("Ignoring user dictionary {}: {:#}", path.display(), e),
            }
        }

        dictionary
    }

    pub fn from_pairs<I, K, V>(direction: Direction, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
            .collect();

        Self { direction, map }
    }

    /// Merge entries over the current table; incoming keys win
    pub fn merge<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (k, v) in overrides {
            self.map.insert(k.as_ref().to_lowercase(), v.into());
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(&word.to_lowercase())
    }

    /// Raw replacement for a word, as stored
    pub fn get(&self, word: &str) -> Option<&str> {
        self.map.get(&word.to_lowercase()).map(String::as_str)
    }

    /// Replacement for a whole word, re-cased to match the input
    pub fn lookup(&self, word: &str) -> Option<String> {
        self.get(word).map(|target| match_case(word, target))
    }

    /// All entries in American/British form, sorted by American spelling
    pub fn entries(&self) -> Vec<DictionaryEntry> {
        let sorted: BTreeMap<&String, &String> = self.map.iter().collect();
        sorted
            .into_iter()
            .map(|(source, target)| match self.direction {
                Direction::AmericanToBritish => DictionaryEntry {
                    american: source.clone(),
                    british: target.clone(),
                },
                Direction::BritishToAmerican => DictionaryEntry {
                    american: target.clone(),
                    british: source.clone(),
                },
            })
            .collect()
    }

    /// The same table read the other way round
    pub fn reversed(&self) -> Self {
        Self {
            direction: self.direction.reversed(),
            map: self
                .map
                .iter()
                .map(|(k, v)| (v.to_lowercase(), k.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_case_preserving_lookup() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.lookup("COLOR").as_deref(), Some("COLOUR"));
        assert_eq!(dict.lookup("Color").as_deref(), Some("Colour"));
        assert_eq!(dict.lookup("color").as_deref(), Some("colour"));
        assert_eq!(dict.lookup("colour"), None);
    }

    #[test]
    fn test_user_overrides_builtin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.json");
        fs::write(&path, r#"{"color": "colour-custom", "Gotten": "got"}"#).unwrap();

        let dict = Dictionary::load(Some(&path));
        assert_eq!(dict.lookup("color").as_deref(), Some("colour-custom"));
        assert_eq!(dict.lookup("gotten").as_deref(), Some("got"));
        assert_eq!(dict.lookup("organize").as_deref(), Some("organise"));
    }

    #[test]
    fn test_malformed_user_dictionary_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.json");
        fs::write(&path, "{ not json").unwrap();

        let dict = Dictionary::load(Some(&path));
        assert_eq!(dict.len(), Dictionary::builtin().len());
        assert_eq!(dict.lookup("color").as_deref(), Some("colour"));
    }

    #[test]
    fn test_direction_is_explicit() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.direction(), Direction::AmericanToBritish);

        let reversed = dict.reversed();
        assert_eq!(reversed.direction(), Direction::BritishToAmerican);
        assert_eq!(reversed.lookup("Colour").as_deref(), Some("Color"));

        let entry = reversed
            .entries()
            .into_iter()
            .find(|e| e.british == "colour")
            .unwrap();
        assert_eq!(entry.american, "color");
    }

    #[test]
    fn test_entries_are_sorted() {
        let dict = Dictionary::from_pairs(
            Direction::AmericanToBritish,
            [("gray", "grey"), ("color", "colour")],
        );
        let americans: Vec<_> = dict.entries().into_iter().map(|e| e.american).collect();
        assert_eq!(americans, vec!["color", "gray"]);
    }
}
