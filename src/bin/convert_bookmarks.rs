//! Convert bookmark trees between CSV and JSON
//!
//! The format of each file is taken from its extension (`.csv` or `.json`).
//!
//! Usage:
//!   cargo run --bin convert_bookmarks -- bookmarks.csv bookmarks.json
//!   RUST_LOG=warn cargo run --bin convert_bookmarks -- toc.json toc.csv

use bookmark_oxide::{BookmarkSession, Error, Result, SessionConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

struct ConvertConfig {
    input: PathBuf,
    output: PathBuf,
}

impl ConvertConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        match args.as_slice() {
            [input, output] => Some(Self {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
            }),
            _ => None,
        }
    }
}

fn format_of(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| {
        Error::MalformedInput(format!("{}: expected a .csv or .json file", path.display()))
    })
}

fn convert(config: &ConvertConfig) -> Result<usize> {
    let input_format = format_of(&config.input)?;
    let output_format = format_of(&config.output)?;

    let content = fs::read_to_string(&config.input)?;
    let mut session = BookmarkSession::new(SessionConfig::default());

    match input_format {
        Format::Csv => {
            let skipped = session.import_csv(&content)?;
            if !skipped.is_empty() {
                eprintln!("Skipped {} malformed row(s): lines {:?}", skipped.len(), skipped);
            }
        },
        Format::Json => session.import_json(&content)?,
    }

    let rendered = match output_format {
        Format::Csv => session.export_csv(),
        Format::Json => session.export_json()?,
    };
    fs::write(&config.output, rendered)?;

    Ok(session.tree().len())
}

fn main() {
    env_logger::init();

    let Some(config) = ConvertConfig::from_args() else {
        eprintln!("Usage: convert_bookmarks <input.csv|input.json> <output.csv|output.json>");
        std::process::exit(2);
    };

    match convert(&config) {
        Ok(count) => {
            println!(
                "Converted {} bookmark(s): {} → {}",
                count,
                config.input.display(),
                config.output.display()
            );
        },
        Err(e) => {
            eprintln!("Conversion failed: {}", e);
            std::process::exit(1);
        },
    }
}
