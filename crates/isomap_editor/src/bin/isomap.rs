//! Command line tool for isometric map files
//!
//! Run with: isomap <command>

use clap::{Parser, Subcommand};
use isomap_core::{map_file, Layer, MapFileError, MapGrid};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Create and inspect isometric map files
#[derive(Parser)]
#[command(name = "isomap")]
#[command(about = "Create and inspect isometric map files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a blank map
    New {
        path: PathBuf,
        /// Width in tiles (1-255)
        #[arg(long)]
        width: u32,
        /// Height in tiles (1-255)
        #[arg(long)]
        height: u32,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the inferred size and layer occupancy of a map
    Info { path: PathBuf },

    /// Check that a map loads and saves back to identical bytes
    Check { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::New {
            path,
            width,
            height,
            force,
        } => new_map(&path, width, height, force),
        Command::Info { path } => info(&path),
        Command::Check { path } => check(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn new_map(path: &Path, width: u32, height: u32, force: bool) -> Result<(), MapFileError> {
    if path.exists() && !force {
        return Err(MapFileError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to replace it)", path.display()),
        )));
    }
    let map = MapGrid::new(width, height)?;
    map_file::save(&map, path)?;
    println!("Created {} ({}x{})", path.display(), width, height);
    Ok(())
}

fn info(path: &Path) -> Result<(), MapFileError> {
    let map = map_file::load(path)?;
    let cells = map.width() * map.height();
    println!("{}", path.display());
    println!("  size: {}x{} ({} cells)", map.width(), map.height(), cells);
    for layer in Layer::ALL {
        let occupied = map.grid(layer).occupied();
        println!(
            "  {:<17} {:>6} occupied ({:.1}%)",
            layer.name(),
            occupied,
            occupied as f64 * 100.0 / cells as f64
        );
    }
    Ok(())
}

fn check(path: &Path) -> Result<(), MapFileError> {
    let bytes = std::fs::read(path)?;
    let map = map_file::decode(&bytes)?;
    let encoded = map_file::encode(&map)?;
    if encoded != bytes {
        let offset = encoded
            .iter()
            .zip(&bytes)
            .position(|(a, b)| a != b)
            .unwrap_or(encoded.len().min(bytes.len()));
        return Err(MapFileError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("re-encoded map differs at byte {offset}"),
        )));
    }
    println!(
        "{}: ok ({}x{}, {} bytes)",
        path.display(),
        map.width(),
        map.height(),
        bytes.len()
    );
    Ok(())
}
