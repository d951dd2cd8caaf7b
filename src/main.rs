//! mshkit CLI - Command-line tool for inspecting `.msh` model files.
//!
//! This is the main entry point for the mshkit command-line application.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use mshkit::prelude::*;

/// mshkit - .msh model file inspection tool
#[derive(Parser)]
#[command(name = "mshkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the indented chunk tree
    Tree {
        /// Input .msh file
        #[arg(env = "MSHKIT_INPUT")]
        input: PathBuf,
    },

    /// Print every chunk with a given tag
    Find {
        /// Input .msh file
        #[arg(env = "MSHKIT_INPUT")]
        input: PathBuf,

        /// Tag to search for (exactly 4 characters)
        #[arg(short, long)]
        tag: Tag,

        /// Only search the root's direct children
        #[arg(short, long)]
        shallow: bool,
    },

    /// Print the leading count of every chunk with a given tag
    Count {
        /// Input .msh file
        #[arg(env = "MSHKIT_INPUT")]
        input: PathBuf,

        /// Tag to search for (exactly 4 characters)
        #[arg(short, long)]
        tag: Tag,
    },

    /// Summarize the chunk tree
    Info {
        /// Input .msh file
        #[arg(env = "MSHKIT_INPUT")]
        input: PathBuf,
    },

    /// Dump the chunk tree as JSON
    Json {
        /// Input .msh file
        #[arg(env = "MSHKIT_INPUT")]
        input: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse every model file under a directory and report failures
    Scan {
        /// Directory to walk
        dir: PathBuf,

        /// File extension to match
        #[arg(short, long, default_value = "msh")]
        extension: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Tree { input } => {
            cmd_tree(&input)?;
        }
        Commands::Find { input, tag, shallow } => {
            cmd_find(&input, tag, shallow)?;
        }
        Commands::Count { input, tag } => {
            cmd_count(&input, tag)?;
        }
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Json { input, pretty } => {
            cmd_json(&input, pretty)?;
        }
        Commands::Scan { dir, extension } => {
            cmd_scan(&dir, &extension)?;
        }
    }

    Ok(())
}

fn open(input: &Path) -> Result<MshFile> {
    MshFile::open(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn cmd_tree(input: &Path) -> Result<()> {
    let file = open(input)?;
    let root = file.root().context("Failed to parse chunk tree")?;

    println!("{}", render(&root));

    Ok(())
}

fn cmd_find(input: &Path, tag: Tag, shallow: bool) -> Result<()> {
    let file = open(input)?;
    let root = file.root().context("Failed to parse chunk tree")?;

    let matches = if shallow {
        root.filter(tag)
    } else {
        root.filter_all(tag)
    };

    for chunk in &matches {
        println!("{}", render(chunk));
    }

    println!("\nTotal: {} chunks", matches.len());

    Ok(())
}

fn cmd_count(input: &Path, tag: Tag) -> Result<()> {
    let file = open(input)?;
    let root = file.root().context("Failed to parse chunk tree")?;

    for (i, chunk) in root.filter_all(tag).iter().enumerate() {
        match chunk.scalar_count() {
            Ok(count) => println!("{:>6} {}", i, count),
            Err(e) => println!("{:>6} error: {}", i, e),
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let start = Instant::now();
    let file = open(input)?;
    let root = file.root().context("Failed to parse chunk tree")?;
    debug!(elapsed = ?start.elapsed(), "parsed");

    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0;
    let mut containers = 0;
    for chunk in root.walk() {
        *histogram.entry(chunk.tag().to_string()).or_default() += 1;
        total += 1;
        if chunk.kind().is_container() {
            containers += 1;
        }
    }

    println!("File: {}", input.display());
    println!("Size: {} bytes", file.data().len());
    println!("Root: {} ({} bytes)", root.tag(), root.length());
    let trailing = file.data().len().saturating_sub(root.span_len());
    if trailing > 0 {
        println!("Trailing: {} bytes after root chunk", trailing);
    }
    println!("Chunks: {} ({} containers, {} leaves)", total, containers, total - containers);
    println!();
    for (tag, count) in &histogram {
        println!("{:>8} {}", count, tag);
    }

    Ok(())
}

fn cmd_json(input: &Path, pretty: bool) -> Result<()> {
    let file = open(input)?;
    let root = file.root().context("Failed to parse chunk tree")?;

    let json = if pretty {
        serde_json::to_string_pretty(&root)?
    } else {
        serde_json::to_string(&root)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_scan(dir: &Path, extension: &str) -> Result<()> {
    println!("Scanning: {}", dir.display());

    let paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();

    println!("Parsing {} files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut failures: Vec<(PathBuf, String)> = paths
        .par_iter()
        .filter_map(|path| {
            let result = MshFile::open(path).and_then(|file| file.root().map(|_| ()));
            pb.inc(1);
            result.err().map(|e| (path.clone(), e.to_string()))
        })
        .collect();

    pb.finish_with_message("Done");

    failures.sort();
    for (path, error) in &failures {
        eprintln!("Error parsing {}: {}", path.display(), error);
    }

    println!(
        "Parsed {} files in {:?} ({} errors)",
        paths.len() - failures.len(),
        start.elapsed(),
        failures.len()
    );

    Ok(())
}
