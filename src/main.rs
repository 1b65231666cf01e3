//! CLI entry point for controller-db-check
//!
//! Checks a game controller database, optionally converting legacy GUIDs,
//! importing an SDL header and writing the formatted database back.

use clap::Parser;
use colored::*;
use controller_db_check::config::{
    load_header, write_formatted, ConfigError, DatabaseFile, FormatOutcome,
};
use controller_db_check::core::{
    serializer::serialize_database, ParseOptions, Reconciler, RecordError, SdlVersion, Warning,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "controller-db-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file to check, e.g. gamecontrollerdb.txt
    input_file: PathBuf,

    /// Sort, format and remove duplicates, then replace the database
    #[arg(long)]
    format: bool,

    /// Convert Windows and Mac OS X GUIDs to the newer SDL 2.0.5 format
    #[arg(long)]
    convert_guids: bool,

    /// Add a platform field to Windows and Mac OS X 2.0.4 entries missing one
    #[arg(long)]
    add_missing_platform: bool,

    /// Import and override mappings using an SDL_gamecontrollerdb.h header
    #[arg(long, value_name = "SDL_HEADER")]
    import_header: Option<PathBuf>,

    /// Reference header guarding upstream mappings
    /// [default: data/SDL_gamecontrollerdb<version>.h next to the database]
    #[arg(long, value_name = "SDL_HEADER")]
    header: Option<PathBuf>,

    /// Database format version [default: guessed from the file name]
    #[arg(long, value_parser = parse_sdl_version)]
    sdl_version: Option<SdlVersion>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_sdl_version(value: &str) -> Result<SdlVersion, String> {
    SdlVersion::from_name(value)
        .ok_or_else(|| format!("unknown SDL version '{}' (expected 2.0.4, 2.0.5 or 2.0.6)", value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("controller_db_check={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if !run(&cli)? {
        std::process::exit(1);
    }

    Ok(())
}

/// Runs every requested pass. Returns false if the database has errors.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let database = DatabaseFile::new(expand(&cli.input_file)?)?;
    let version = cli.sdl_version.unwrap_or_else(|| database.version());

    let infer_platform = resolve_platform_inference(cli, version);
    let options = ParseOptions::new(version).with_platform_inference(infer_platform);
    let mut reconciler = Reconciler::new(options);

    println!("\n{} Applying checks ({} format).", "→".cyan(), version);

    load_reference(cli, &database, version, &mut reconciler)?;

    let content = database.read()?;
    reconciler.ingest_str(&content);

    let success = reconciler.report().is_success();
    for error in &reconciler.report().errors {
        print_record_error(error);
    }

    if success {
        println!("{} {}", "✓".green().bold(), "No mapping errors found.".bold());
    } else {
        let count = reconciler.report().errors.len();
        println!(
            "\n{} Found {} mapping error{}",
            "✗".red().bold(),
            count,
            if count == 1 { "" } else { "s" }
        );
    }

    if cli.convert_guids {
        println!("\n{} Converting GUIDs to SDL 2.0.5+ format.", "→".cyan());
        debug_output_notice(cli);

        let converted = reconciler.convert_guids();
        for conversion in &reconciler.report().conversions {
            println!("{}", conversion);
        }
        println!("{} Converted {} GUID(s)", "✓".green(), converted);
    }

    if let Some(header) = &cli.import_header {
        println!("\n{} Importing mappings from {}", "→".cyan(), header.display());
        debug_output_notice(cli);

        let records = load_header(&expand(header)?)?;
        let imported = reconciler.import_overrides(records);
        println!("{} Imported {} mapping(s)", "✓".green(), imported);
    }

    print_warnings(reconciler.report().warnings.as_slice());

    if cli.format {
        println!("\n{} Formatting db.", "→".cyan());
        let formatted = serialize_database(reconciler.registry(), reconciler.options().version);

        match write_formatted(&database, &formatted, success)? {
            FormatOutcome::Replaced { backup } => println!(
                "{} Wrote {} (backup: {})",
                "✓".green(),
                database.path().display(),
                backup.display()
            ),
            FormatOutcome::Staged { staged } => println!(
                "{} Database has errors; formatted output left at {}, {} untouched",
                "⚠".yellow(),
                staged.display(),
                database.path().display()
            ),
        }
    }

    Ok(success)
}

/// Platform inference only applies to SDL 2.0.4 databases
fn resolve_platform_inference(cli: &Cli, version: SdlVersion) -> bool {
    if !cli.add_missing_platform {
        return false;
    }

    if !version.allows_platform_inference() {
        println!("{}", "Cannot add missing platforms on newer SDL database.".yellow());
        return false;
    }

    println!("Will try to add missing platforms. Requires SDL 2.0.4 GUID.");
    debug_output_notice(cli);
    true
}

/// Fill the authoritative set from the reference header
///
/// A missing default header only disables override checks; a header
/// named on the command line must exist.
fn load_reference(
    cli: &Cli,
    database: &DatabaseFile,
    version: SdlVersion,
    reconciler: &mut Reconciler,
) -> anyhow::Result<()> {
    let records = match &cli.header {
        Some(path) => load_header(&expand(path)?)?,
        None => {
            let path = database.default_header_path(version);
            match load_header(&path) {
                Ok(records) => records,
                Err(ConfigError::NotFound(path)) => {
                    println!(
                        "{} Reference header {} not found, upstream override checks disabled",
                        "⚠".yellow(),
                        path.display()
                    );
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    let loaded = reconciler.load_reference(records);
    tracing::info!("Loaded {} reference mappings", loaded);
    Ok(())
}

/// Expand tilde in path
fn expand(path: &Path) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(
        path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    Ok(PathBuf::from(expanded.as_ref()))
}

fn debug_output_notice(cli: &Cli) {
    if !cli.format {
        println!(
            "{}",
            "Use --format option to save database. Running in debug output mode...".dimmed()
        );
    }
}

fn print_record_error(error: &RecordError) {
    match error {
        RecordError::Invalid { line, source, .. } => {
            println!("\n{}", format!("Error at line #{}", line).red().bold());
            println!("{}", source);
        }
        RecordError::DuplicateRecord {
            line,
            previous_line,
            ..
        } => {
            println!("\n{}", format!("Duplicate detected at line #{}", line).red().bold());
            println!("Previous mapping at line #{}", previous_line);
        }
        RecordError::IllegalOverride { line, .. } => {
            println!(
                "\n{}",
                format!("Cannot modify upstream SDL header mapping at line #{}", line)
                    .red()
                    .bold()
            );
            println!(
                "If you have problems with an official SDL mapping, please report the issue \
                 or send a pull request to the SDL project : libsdl.org."
            );
        }
    }

    println!("{}", "In mapping".dimmed());
    println!("{}", error.text());
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        println!("\n{} {}", "⚠".yellow(), warning);
        if let Warning::MigrationCollision { dropped, .. } = warning {
            println!("{}", dropped.dimmed());
        }
    }
}
