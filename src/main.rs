use anyhow::{bail, Context, Result};
use citeable::config::file_config::ConfigFile;
use citeable::config::{
    default_config_path, find_config_file, get_config, load_config, Config, LogFormat,
    LoggingConfig,
};
use citeable::models::Entry;
use citeable::ui::{print_section, print_status, Status};
use citeable::utils::{
    assign_unique_keys, deduplicate, find_key_collisions, format_authors_bibtex,
    to_bibtex_string, write_bibtex,
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// citeable - Deduplicate citation entries, assign stable keys, and write BibTeX
#[derive(Parser, Debug)]
#[command(name = "citeable")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deduplicate citation entries, assign stable keys, and write BibTeX", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve keys and write a BibTeX file from a JSON array of entries
    #[command(alias = "w")]
    Write {
        /// Input JSON file containing entry records
        input: PathBuf,

        /// Output .bib file (default: output.path from config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print BibTeX to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Show the keys entries would be written with
    #[command(alias = "k")]
    Keys {
        /// Input JSON file containing entry records
        input: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
        format: OutputFormat,

        /// Show colliding keys without resolving them
        #[arg(long, short)]
        show: bool,
    },

    /// Remove content-duplicate entries from a JSON file
    #[command(alias = "dedup")]
    Dedupe {
        /// Input JSON file containing entry records
        input: PathBuf,

        /// Output file (default: overwrite input)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Where to write it (default: user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("citeable - Environment Variables");
    println!();
    println!("Output Settings:");
    println!("  CITEABLE_OUTPUT__PATH       Default .bib file for `citeable write` (default: references.bib)");
    println!();
    println!("Logging:");
    println!("  CITEABLE_LOGGING__LEVEL     Log level when -v is not given (default: info)");
    println!("  CITEABLE_LOGGING__FORMAT    Log format: text or json (default: text)");
    println!("  RUST_LOG                    Overrides all of the above (e.g. citeable=debug)");
    println!();
    println!("Example:");
    println!("  export CITEABLE_OUTPUT__PATH=\"./paper/refs.bib\"");
}

/// Initialize tracing based on verbosity and the logging config
fn init_tracing(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("citeable={}", level)));

    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        print_status(Status::Error, format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(());
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config().context("Invalid configuration in environment")?,
    };

    init_tracing(cli.verbose, cli.quiet, &config.logging);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        Some(Commands::Write {
            input,
            output,
            stdout,
        }) => {
            if stdout {
                println!("{}", render_entries(&input)?);
                return Ok(());
            }

            let output_path = output.unwrap_or_else(|| config.output.path.clone());
            let written = write_entries(&input, &output_path)?;

            if !cli.quiet {
                print_status(
                    Status::Success,
                    format!("Wrote {} entries to {}", written, output_path.display()),
                );
            }
        }

        Some(Commands::Keys {
            input,
            format,
            show,
        }) => {
            if show {
                print!("{}", collision_report(&input)?);
            } else {
                let mut entries = load_entries(&input)?;
                let unique = assign_unique_keys(entries.iter_mut())?;
                let resolved: Vec<&Entry> = unique.iter().map(|e| &**e).collect();
                output_keys(&resolved, format)?;
            }
        }

        Some(Commands::Dedupe { input, output }) => {
            let output_path = output.unwrap_or_else(|| input.clone());
            let (total, kept) = dedupe_entries(&input, &output_path)?;

            if !cli.quiet {
                print_status(
                    Status::Success,
                    format!(
                        "Deduplicated: {} -> {} entries ({})",
                        total,
                        kept,
                        output_path.display()
                    ),
                );
            }
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Init { path, force } => {
                let path = path.unwrap_or_else(default_config_path);
                init_config(&path, force)?;

                if !cli.quiet {
                    print_status(
                        Status::Success,
                        format!("Wrote default configuration to {}", path.display()),
                    );
                }
            }
            ConfigCommands::Show => {
                let color = std::io::stdout().is_terminal();
                print_section("Configuration", color);
                match &config_path {
                    Some(path) => println!("# from {}", path.display()),
                    None => println!("# defaults and environment"),
                }
                println!("{}", toml::to_string_pretty(&config)?);
            }
        },

        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Resolve keys once and write the BibTeX file, returning the entry count
fn write_entries(input: &Path, output: &Path) -> Result<usize> {
    let mut entries = load_entries(input)?;
    write_bibtex(entries.iter_mut(), output)
        .with_context(|| format!("Failed to write {}", output.display()))
}

/// Resolve keys and render BibTeX text for `--stdout`
fn render_entries(input: &Path) -> Result<String> {
    let mut entries = load_entries(input)?;
    Ok(to_bibtex_string(entries.iter_mut())?)
}

/// Describe colliding keys among the distinct entries, without resolving them
fn collision_report(input: &Path) -> Result<String> {
    let mut entries = load_entries(input)?;
    let unique = deduplicate(entries.iter_mut());
    let collisions = find_key_collisions(unique.iter().map(|e| &**e));

    if collisions.is_empty() {
        return Ok("No key collisions found\n".to_string());
    }

    let mut report = format!("Found {} colliding keys:\n", collisions.len());
    for group in &collisions {
        report.push_str(&format!("  {}: {} entries\n", group.key, group.members.len()));
        for &idx in &group.members {
            report.push_str(&format!(
                "    - {} ({})\n",
                unique[idx].title(),
                unique[idx].entry_type()
            ));
        }
    }
    Ok(report)
}

/// Drop content duplicates and write the survivors as JSON records.
/// Returns the entry counts before and after.
fn dedupe_entries(input: &Path, output: &Path) -> Result<(usize, usize)> {
    let mut entries = load_entries(input)?;
    let total = entries.len();

    let unique = deduplicate(entries.iter_mut());
    let output_json = serde_json::to_string_pretty(&unique)?;
    std::fs::write(output, output_json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok((total, unique.len()))
}

/// Write a default configuration file, refusing to overwrite unless forced
fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    ConfigFile::from(Config::default()).save(path)?;
    Ok(())
}

/// Read a JSON array of entry records
fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    let json_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entries: Vec<Entry> = serde_json::from_str(&json_str)
        .with_context(|| format!("Invalid entries in {}", path.display()))?;
    tracing::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn output_keys(entries: &[&Entry], format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "key": e.key(),
                        "type": e.entry_type(),
                        "title": e.title(),
                        "authors": e.authors(),
                        "year": e.year(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Plain => {
            for entry in entries {
                println!("{}\t{}", entry.key(), entry.title());
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Key", "Type", "Title", "Authors", "Year"]);

            for entry in entries {
                table.add_row(vec![
                    Cell::new(entry.key()).add_attribute(Attribute::Bold),
                    Cell::new(entry.entry_type()),
                    Cell::new(truncate(entry.title(), 50)),
                    Cell::new(truncate(&format_authors_bibtex(entry.authors()), 30)),
                    Cell::new(entry.year()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ENTRIES_JSON: &str = r#"[
        {"type": "misc", "author": ["Smith, A"], "title": "P1", "year": 2024},
        {"type": "misc", "author": ["Smith, B"], "title": "P2", "year": 2024},
        {"type": "misc", "author": ["Jones, C"], "title": "P3", "year": 2024, "key": "Smith.2024.a"},
        {"type": "misc", "author": ["Smith, A"], "title": "P1", "year": 2024, "app": "copy"}
    ]"#;

    fn write_input(dir: &Path) -> PathBuf {
        let input = dir.join("entries.json");
        std::fs::write(&input, ENTRIES_JSON).unwrap();
        input
    }

    #[test]
    fn test_cli_version() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "citeable");
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["citeable"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["citeable", "-vv", "keys", "refs.json"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_write_command() {
        let cli = Cli::parse_from(["citeable", "write", "entries.json", "-o", "refs.bib"]);
        match &cli.command {
            Some(Commands::Write {
                input,
                output,
                stdout,
            }) => {
                assert_eq!(input, &PathBuf::from("entries.json"));
                assert_eq!(output.as_deref(), Some(Path::new("refs.bib")));
                assert!(!*stdout);
            }
            _ => panic!("Expected Write command"),
        }
    }

    #[test]
    fn test_cli_write_stdout_conflicts_with_output() {
        let result =
            Cli::try_parse_from(["citeable", "write", "entries.json", "-o", "x.bib", "--stdout"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_keys_command() {
        let cli = Cli::parse_from(["citeable", "k", "entries.json", "--format", "plain", "--show"]);
        match &cli.command {
            Some(Commands::Keys { format, show, .. }) => {
                assert_eq!(*format, OutputFormat::Plain);
                assert!(*show);
            }
            _ => panic!("Expected Keys command"),
        }
    }

    #[test]
    fn test_cli_dedupe_alias() {
        let cli = Cli::parse_from(["citeable", "dedup", "entries.json"]);
        assert!(matches!(cli.command, Some(Commands::Dedupe { output: None, .. })));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["citeable", "--config", "c.toml", "config", "init", "--force"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match &cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Init { path, force },
            }) => {
                assert!(path.is_none());
                assert!(*force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Über eine lange Geschichte", 10), "Über ei...");
    }

    #[test]
    fn test_write_file_matches_stdout() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("refs.bib");

        assert_eq!(write_entries(&input, &output).unwrap(), 3);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, render_entries(&input).unwrap());
        assert!(written.contains("@misc{Smith.2024.b,"));
        assert!(!written.contains("Smith.2024.a.a"));
    }

    #[test]
    fn test_write_uses_configured_output_path() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());
        let configured = dir.path().join("paper.bib");

        let mut config = Config::default();
        config.output.path = configured.clone();
        let config_path = dir.path().join("citeable.toml");
        ConfigFile::from(config).save(&config_path).unwrap();

        let loaded = load_config(&config_path).unwrap();
        assert_eq!(loaded.output.path, configured);
        write_entries(&input, &loaded.output.path).unwrap();
        assert!(configured.exists());
    }

    #[test]
    fn test_write_missing_input_fails() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("refs.bib");

        let err = write_entries(&dir.path().join("missing.json"), &output).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
        assert!(!output.exists());
    }

    #[test]
    fn test_collision_report() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());

        let report = collision_report(&input).unwrap();
        assert!(report.starts_with("Found 1 colliding keys:"));
        assert!(report.contains("  Smith.2024: 2 entries"));
        assert!(report.contains("    - P1 (Misc)"));
        assert!(report.contains("    - P2 (Misc)"));

        let single = dir.path().join("single.json");
        std::fs::write(
            &single,
            r#"[{"type": "misc", "author": ["Smith, A"], "title": "P1", "year": 2024}]"#,
        )
        .unwrap();
        assert_eq!(collision_report(&single).unwrap(), "No key collisions found\n");
    }

    #[test]
    fn test_dedupe_overwrites_input() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());

        assert_eq!(dedupe_entries(&input, &input).unwrap(), (4, 3));

        let entries = load_entries(&input).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title(), "P1");
        assert_eq!(entries[0].app(), None);
        assert_eq!(entries[2].key(), "Smith.2024.a");
    }

    #[test]
    fn test_config_init() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_config(&path, false).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.output.path, PathBuf::from("references.bib"));

        let err = init_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        init_config(&path, true).unwrap();
    }
}
