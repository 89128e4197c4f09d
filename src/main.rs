//! AcroTUI - Terminal Acronym Manager
//!
//! ## Usage
//!
//! ```bash
//! acrotui                               # opens MasterAcronym.txt
//! acrotui acronyms.txt --write-back     # save every change to the file
//! acrotui acronyms.txt -s bureau -o -   # print matching lines and exit
//! ```
//!
//! ## Keys
//!
//! - `j/k`: Move down/up
//! - `/`: Search
//! - `a`, `e`, `d`: Add, edit, delete
//! - `x`: Export
//! - `q`: Quit

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use acrotui::codec;
use acrotui::config::{Config, DEFAULT_LOG_LEVEL};
use acrotui::controller::run_app;
use acrotui::logging;
use acrotui::store::filter;

/// Runs CLI mode: load the file, optionally filter, and write to output.
fn run_cli_mode(file_path: &PathBuf, search: Option<&str>, output: &str) -> Result<()> {
    let records = codec::decode_file(file_path)
        .with_context(|| format!("Failed to load acronyms from {}", file_path.display()))?;

    let selected: Vec<_> = filter(&records, search.unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    let content = codec::encode(&selected);
    info!(
        total = records.len(),
        selected = selected.len(),
        output,
        "cli export"
    );

    if output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if !content.is_empty() {
            writeln!(handle, "{}", content)?;
        }
    } else {
        std::fs::write(output, &content)
            .with_context(|| format!("Failed to write {}", output))?;
        eprintln!("Wrote {} acronyms to {}", selected.len(), output);
    }

    Ok(())
}

/// AcroTUI - maintain a list of acronyms in the terminal
///
/// When run without -o/--output, opens the interactive TUI.
/// With -o/--output, runs in CLI mode and writes the (optionally searched)
/// list to a file, or stdout with "-".
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Acronym file (ACRONYM|DESCRIPTION per line)
    #[arg(default_value = "MasterAcronym.txt")]
    file: PathBuf,

    /// Directory exports are written to
    #[arg(short = 'e', long = "export-dir", default_value = ".")]
    export_dir: PathBuf,

    /// Write every change back to the acronym file (default: session only)
    #[arg(short = 'w', long = "write-back")]
    write_back: bool,

    /// Use Unicode glyphs
    #[arg(long = "fancy")]
    fancy: bool,

    /// Log level or filter directive (overridden by ACROTUI_LOG)
    #[arg(long = "log-level", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Output file (enables CLI mode). Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Only output acronyms matching this term (CLI mode)
    #[arg(short = 's', long = "search", requires = "output")]
    search: Option<String>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            source: args.file.clone(),
            export_dir: args.export_dir.clone(),
            write_back: args.write_back,
            fancy: args.fancy,
            log_level: args.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // CLI mode: output to file/stdout
    if let Some(output) = &args.output {
        let log_path = logging::init(&args.log_level, &std::env::temp_dir())?;
        let result = run_cli_mode(&args.file, args.search.as_deref(), output);
        eprintln!("Log written to {}", log_path.display());
        return result;
    }

    if !args.export_dir.is_dir() {
        anyhow::bail!("Export directory does not exist: {}", args.export_dir.display());
    }

    let config = Config::from(&args);
    let log_path = logging::init(&config.log_level, &std::env::temp_dir())?;

    let result = run_app(&config);
    eprintln!("Log written to {}", log_path.display());
    result
}
