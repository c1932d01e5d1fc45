use anyhow::{Context, Result};
use britfix::cli::output::{self, OutputFormat};
use britfix::config::Overrides;
use britfix::parser::FileType;
use britfix::units::UnitConfig;
use britfix::{dict, ChangeStats, Config, Conversion, Converter};
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Parser, Debug)]
#[command(name = "britfix")]
#[command(version, about = "Convert American English to British English", long_about = None)]
struct Cli {
    /// Files or directories to convert (reads stdin when omitted)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Write conversions back to the files
    #[arg(short, long)]
    write: bool,

    /// Confirm each file before writing
    #[arg(short, long, requires = "write")]
    interactive: bool,

    /// Exit with code 1 if any file needs changes
    #[arg(long, conflicts_with = "write")]
    check: bool,

    /// Convert imperial units to metric
    #[arg(long)]
    units: bool,

    /// Leave quotes as they are
    #[arg(long)]
    no_quotes: bool,

    /// Turn straight quotes into curly ones
    #[arg(long, conflicts_with = "no_quotes")]
    smart_quotes: bool,

    /// Convert everything, including code and strings
    #[arg(long)]
    plain: bool,

    /// Language or extension hint for stdin or unknown files (e.g. rs, python)
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// User dictionary file (JSON)
    #[arg(long, env = "BRITFIX_USER_DICT")]
    user_dict: Option<PathBuf>,

    /// Unit conversion settings (JSON)
    #[arg(long, env = "BRITFIX_UNIT_CONFIG")]
    unit_config: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// User dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
    /// List words converted only in the right sense
    Contextual,
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List user dictionary entries
    List,
    /// Add or replace an entry
    Add {
        /// American spelling
        american: String,
        /// British spelling
        british: String,
    },
    /// Remove an entry
    Remove {
        /// American spelling
        american: String,
    },
    /// Print the user dictionary location
    Path,
    /// Print every mapping in effect, built-in and user
    Words,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "britfix", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(Overrides {
        units: cli.units.then_some(true),
        smart_quotes: cli.smart_quotes.then_some(true),
        code_aware: cli.plain.then_some(false),
        user_dictionary: cli.user_dict.clone(),
        unit_config: cli.unit_config.clone(),
    })?;
    debug!("Configuration: {:?}", config);

    // Handle subcommands
    if let Some(command) = &cli.command {
        return handle_command(command, &config);
    }

    let unit_config = UnitConfig::load(config.unit_config.as_deref());
    let converter = Converter::new(&config, unit_config);

    if cli.files.is_empty() {
        return convert_stdin(&cli, &config, &converter);
    }

    let files = collect_files(&cli.files);
    if files.is_empty() {
        anyhow::bail!("No files to convert. Use --help for usage information.");
    }

    let progress = (cli.write && files.len() > 1).then(|| {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    });

    let results: Vec<(PathBuf, Result<Conversion>)> = files
        .par_iter()
        .map(|path| {
            let result = convert_file(path, &cli, &config, &converter);
            if let Some(pb) = &progress {
                pb.inc(1);
            }
            (path.clone(), result)
        })
        .collect();

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let colored = !cli.no_color;
    let mut totals = ChangeStats::default();
    let mut files_changed = 0;
    let mut failures = 0;

    for (path, result) in results {
        let conversion = match result {
            Ok(conversion) => conversion,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failures += 1;
                continue;
            }
        };

        totals += conversion.stats;
        if conversion.is_unchanged() {
            continue;
        }
        files_changed += 1;

        let name = path.display().to_string();
        output::print_report(&name, &conversion, colored, cli.format, false)?;

        if cli.write {
            if cli.interactive && !output::confirm_write(&name, conversion.changes.len())? {
                continue;
            }
            fs::write(&path, &conversion.text)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
    }

    output::print_summary(
        &totals,
        files.len(),
        files_changed,
        cli.write,
        colored,
        cli.format,
    )?;

    if failures > 0 || (cli.check && files_changed > 0) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn convert_stdin(cli: &Cli, config: &Config, converter: &Converter) -> Result<()> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;

    let conversion = convert_text(&text, cli.lang.as_deref(), cli, config, converter)?;
    match cli.format {
        OutputFormat::Text => print!("{}", conversion.text),
        OutputFormat::Json => output::print_report("-", &conversion, false, cli.format, true)?,
    }

    io::stdout().flush().context("Failed to flush stdout")?;

    if cli.check && !conversion.is_unchanged() {
        std::process::exit(1);
    }
    Ok(())
}

fn convert_file(path: &Path, cli: &Cli, config: &Config, converter: &Converter) -> Result<Conversion> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let hint = cli.lang.clone().or_else(|| path.to_str().map(str::to_string));

    convert_text(&text, hint.as_deref(), cli, config, converter)
        .with_context(|| format!("Failed to convert file: {}", path.display()))
}

fn convert_text(
    text: &str,
    hint: Option<&str>,
    cli: &Cli,
    config: &Config,
    converter: &Converter,
) -> Result<Conversion> {
    let normalise_quotes = !cli.no_quotes;
    if config.code_aware {
        Ok(converter.process_code_aware(text, hint, normalise_quotes)?)
    } else {
        Ok(converter.convert_to_british(text, normalise_quotes))
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.') || matches!(name, "target" | "node_modules"))
            .unwrap_or(false)
}

/// Expand directories into the files inside them that we know how to read
fn collect_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            eprintln!("Error: File not found: {}", input.display());
            continue;
        }

        for entry in WalkDir::new(input)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e))
        {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    let known = entry
                        .path()
                        .extension()
                        .and_then(|e| e.to_str())
                        .and_then(FileType::from_extension)
                        .is_some();
                    if known {
                        files.push(entry.into_path());
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable entry: {}", e),
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

fn handle_command(command: &Commands, config: &Config) -> Result<()> {
    let user_dict = || {
        config
            .user_dictionary
            .clone()
            .context("Failed to determine the user dictionary location")
    };

    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_entries(&user_dict()?)?;
            }
            DictCommands::Add { american, british } => {
                dict::manager::add_entry(&user_dict()?, american, british)?;
            }
            DictCommands::Remove { american } => {
                dict::manager::remove_entry(&user_dict()?, american)?;
            }
            DictCommands::Path => {
                println!("{}", user_dict()?.display());
            }
            DictCommands::Words => {
                let converter = Converter::new(config, UnitConfig::default());
                dict::manager::list_words(converter.dictionary());
            }
        },
        Commands::Contextual => {
            let converter = Converter::new(config, UnitConfig::default());
            dict::manager::list_contextual(&converter.supported_contextual_words());
        }
    }
    Ok(())
}
