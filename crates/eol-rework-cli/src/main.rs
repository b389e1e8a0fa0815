//! eol-rework CLI - move end-of-line test records into rework tables.

use clap::{Parser, Subcommand};
use eol_rework::{store_for_line, Config, ReworkError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "eol-rework")]
#[command(about = "Move end-of-line test records into rework tables")]
#[command(version)]
struct Cli {
    /// Path to YAML or JSON configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive one record into the line's rework table and purge it
    Store {
        /// Name of the configured production line
        #[arg(long)]
        line: String,

        /// Serial number of the record to archive
        #[arg(long)]
        serial: String,

        /// Part number, for lines that key records by serial and part
        #[arg(long)]
        part: Option<String>,

        /// Status code key to tag the archived record with
        #[arg(long)]
        status: i32,
    },

    /// List configured lines and their status codes
    Lines,

    /// Check the configuration file without touching any database
    Validate,

    /// Write a sample configuration file
    InitConfig {
        /// Output path for configuration file [default: config.yaml]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite existing file without confirmation
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ReworkError> {
    let cli = Cli::parse();

    // Handle init-config separately (doesn't need an existing config)
    if let Commands::InitConfig { output, force } = cli.command {
        let path = output.unwrap_or_else(|| PathBuf::from("config.yaml"));
        if path.exists() && !force {
            return Err(ReworkError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        std::fs::write(&path, Config::sample_yaml())?;
        println!("Wrote sample configuration to {}", path.display());
        return Ok(());
    }

    // Setup logging
    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(ReworkError::Config)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::InitConfig { .. } => unreachable!(), // Handled above

        Commands::Store {
            line,
            serial,
            part,
            status,
        } => {
            let line_config = config.line(&line).ok_or_else(|| {
                let known = config
                    .lines
                    .iter()
                    .map(|l| l.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                ReworkError::Config(format!("unknown line '{}' (configured: {})", line, known))
            })?;

            if serial.trim().is_empty() {
                return Err(ReworkError::Config(
                    "serial number must not be blank".to_string(),
                ));
            }

            let status_code = line_config.status(status).ok_or_else(|| {
                let known = line_config
                    .status_codes
                    .iter()
                    .map(|s| format!("{} ({})", s.key, s.label))
                    .collect::<Vec<_>>()
                    .join(", ");
                ReworkError::Config(format!(
                    "status {} is not defined for line '{}' (available: {})",
                    status, line, known
                ))
            })?;

            let outcome = store_for_line(line_config, status, &serial, part.as_deref()).await?;

            if cli.output_json {
                let result = serde_json::json!({
                    "line": line_config.name,
                    "serial": serial,
                    "part": part,
                    "status": status_code.key,
                    "status_label": status_code.label,
                    "rows_archived": outcome.rows_archived,
                    "source_rows_deleted": outcome.source_rows_deleted,
                    "auxiliary_rows_deleted": outcome.auxiliary_rows_deleted,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\nRecord archived!");
                println!("  Line: {}", line_config.name);
                println!("  Serial: {}", serial);
                if let Some(ref part) = part {
                    println!("  Part: {}", part);
                }
                println!("  Status: {} ({})", status_code.key, status_code.label);
                println!("  Rows archived: {}", outcome.rows_archived);
                println!("  Source rows deleted: {}", outcome.source_rows_deleted);
                println!(
                    "  Auxiliary rows deleted: {}",
                    outcome.auxiliary_rows_deleted
                );
            }
        }

        Commands::Lines => {
            if cli.output_json {
                let lines: Vec<_> = config
                    .lines
                    .iter()
                    .map(|l| {
                        serde_json::json!({
                            "name": l.name,
                            "source_table": l.source_table.table,
                            "destination_table": l.destination_table.table,
                            "status_codes": l.status_codes,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                for line in &config.lines {
                    println!(
                        "{} ({} -> {})",
                        line.name, line.source_table.table, line.destination_table.table
                    );
                    for status in &line.status_codes {
                        println!("  {}: {}", status.key, status.label);
                    }
                }
            }
        }

        Commands::Validate => {
            // Config::load already ran validation; report what it found
            println!("Configuration OK: {} line(s)", config.lines.len());
            for line in &config.lines {
                println!(
                    "  {} ({} auxiliary table(s), {} status code(s))",
                    line.name,
                    line.auxiliary_tables.len(),
                    line.status_codes.len()
                );
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
