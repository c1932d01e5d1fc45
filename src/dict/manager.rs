use crate::converter::dictionary::Dictionary;
use anyhow::{bail, Context, Result};
use colored::*;
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Written to a fresh user dictionary so the expected shape is obvious
const EXAMPLE_ENTRY: (&str, &str) = ("color", "colour");

/// Create the user dictionary with one example entry if it does not exist.
///
/// Returns `true` when a new file was written.
pub fn ensure_user_dictionary(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create user dictionary directory")?;
    }

    let mut entries = BTreeMap::new();
    entries.insert(EXAMPLE_ENTRY.0.to_string(), EXAMPLE_ENTRY.1.to_string());
    write_user_dictionary(path, &entries)?;
    info!("Created user dictionary at {}", path.display());

    Ok(true)
}

/// Read a `{ "american": "british" }` JSON object. Keys are lowercased.
pub fn read_user_dictionary(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read user dictionary: {}", path.display()))?;
    let raw: BTreeMap<String, String> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse user dictionary: {}", path.display()))?;

    Ok(raw
        .into_iter()
        .map(|(american, british)| (american.trim().to_lowercase(), british.trim().to_string()))
        .filter(|(american, british)| !american.is_empty() && !british.is_empty())
        .collect())
}

pub fn write_user_dictionary(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialise user dictionary")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write user dictionary: {}", path.display()))
}

pub fn add_entry(path: &Path, american: &str, british: &str) -> Result<()> {
    let american = american.trim().to_lowercase();
    let british = british.trim();
    if american.is_empty() || british.is_empty() {
        bail!("Both the American and the British spelling are required");
    }

    ensure_user_dictionary(path)?;
    let mut entries = read_user_dictionary(path)?;
    let previous = entries.insert(american.clone(), british.to_string());
    write_user_dictionary(path, &entries)?;

    match previous {
        Some(old) if old != british => println!(
            "{} {} → {} (was {})",
            "✓".green().bold(),
            american.cyan(),
            british.green(),
            old.dimmed()
        ),
        _ => println!("{} {} → {}", "✓".green().bold(), american.cyan(), british.green()),
    }

    Ok(())
}

/// Returns whether an entry was removed
pub fn remove_entry(path: &Path, american: &str) -> Result<bool> {
    if !path.exists() {
        println!("{}", "No user dictionary yet.".yellow());
        return Ok(false);
    }

    let american = american.trim().to_lowercase();
    let mut entries = read_user_dictionary(path)?;
    let removed = entries.remove(&american).is_some();

    if removed {
        write_user_dictionary(path, &entries)?;
        println!("{} Removed {}", "✓".green().bold(), american.cyan());
    } else {
        println!("{} {} is not in the user dictionary", "✗".red().bold(), american.yellow());
    }

    Ok(removed)
}

pub fn list_entries(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("{}", "No user dictionary yet.".yellow());
        println!(
            "Run {} to add an entry.",
            "britfix dict add <american> <british>".cyan()
        );
        return Ok(());
    }

    let entries = read_user_dictionary(path)?;
    if entries.is_empty() {
        println!("{}", "User dictionary is empty.".yellow());
    } else {
        println!("{}", "User dictionary entries:".bold());
        println!();
        for (american, british) in &entries {
            println!("  {} → {}", american.cyan(), british.green());
        }
    }

    println!();
    println!("Dictionary file: {}", path.display().to_string().dimmed());

    Ok(())
}

/// Print every mapping the converter will apply, built-in and user
pub fn list_words(dictionary: &Dictionary) {
    for entry in dictionary.entries() {
        println!("{}\t{}", entry.american, entry.british);
    }
}

pub fn list_contextual(words: &[String]) {
    println!("{}", "Contextual words (converted only in the right sense):".bold());
    for word in words {
        println!("  {}", word.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_creates_example() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dictionary.json");

        assert!(ensure_user_dictionary(&path).unwrap());
        assert!(!ensure_user_dictionary(&path).unwrap());

        let entries = read_user_dictionary(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["color"], "colour");
    }

    #[test]
    fn test_add_and_remove() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dictionary.json");

        add_entry(&path, "Gotten", "got").unwrap();
        let entries = read_user_dictionary(&path).unwrap();
        assert_eq!(entries["gotten"], "got");

        assert!(remove_entry(&path, "gotten").unwrap());
        assert!(!remove_entry(&path, "gotten").unwrap());
        assert!(!read_user_dictionary(&path).unwrap().contains_key("gotten"));
    }

    #[test]
    fn test_add_rejects_blank() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        assert!(add_entry(&path, "color", "  ").is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        fs::write(&path, "[\"color\"]").unwrap();
        assert!(read_user_dictionary(&path).is_err());
    }
}
