//! Palsave CLI - Command-line tool for Palworld save files.
//!
//! This is the main entry point for the palsave command-line application.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use palsave::gvas::KeyTypeOverride;
use palsave::prelude::*;

/// Palsave - Palworld save conversion and host migration tool
#[derive(Parser)]
#[command(name = "palsave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the uesave executable (defaults to bin/uesave)
    #[arg(long, global = true, env = "PALSAVE_UESAVE")]
    uesave: Option<PathBuf>,

    /// Extra map key type for uesave, as `<path>.Key=<type>`
    #[arg(long = "key-type", global = true)]
    key_types: Vec<KeyTypeOverride>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between .sav, .gvas and .json files
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Compression for .sav output (default: double for Level saves, single otherwise)
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,
    },

    /// Move the co-op host's progress onto their dedicated-server identity
    FixHost {
        /// World save folder containing Level.sav and Players/
        folder: PathBuf,

        /// The host's new player GUID (32 hex digits)
        guid: String,

        /// Copy each file to <name>.bak before changing it
        #[arg(short, long)]
        backup: bool,
    },

    /// Show the container header of a .sav file
    Inspect {
        /// Input .sav file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Single,
    Double,
}

impl From<Mode> for SaveType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => SaveType::Single,
            Mode::Double => SaveType::Double,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    ExitCode::from(exit_status(run(cli), &mut io::stderr()))
}

/// Report `result` on `stderr` and pick the process exit status.
fn exit_status(result: Result<()>, stderr: &mut dyn Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(stderr, "error: {e:#}");
            1
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        uesave,
        key_types,
        command,
    } = cli;
    let converter = move || -> palsave::gvas::Result<UesaveConverter> {
        let converter = match uesave {
            Some(path) => UesaveConverter::new(path),
            None => UesaveConverter::locate("bin")?,
        };
        Ok(key_types
            .into_iter()
            .fold(converter, UesaveConverter::add_key_type))
    };

    match command {
        Commands::Convert {
            input,
            output,
            mode,
        } => cmd_convert(&input, &output, mode.map(SaveType::from), converter),
        Commands::FixHost {
            folder,
            guid,
            backup,
        } => cmd_fix_host(&folder, &guid, backup, converter()?),
        Commands::Inspect { file } => cmd_inspect(&file),
    }
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn cmd_convert<F>(input: &Path, output: &Path, mode: Option<SaveType>, converter: F) -> Result<()>
where
    F: FnOnce() -> palsave::gvas::Result<UesaveConverter>,
{
    let pb = spinner(format!("Converting {} -> {}", input.display(), output.display()))?;

    let start = Instant::now();
    let result = convert(input, output, mode, converter);
    pb.finish_and_clear();
    let conversion = result.context("Conversion failed")?;

    match conversion.save_type {
        Some(save_type) => println!(
            "Converted {} -> {} ({} save, {} bytes) in {:?}",
            conversion.from,
            conversion.to,
            save_type,
            conversion.bytes_written,
            start.elapsed()
        ),
        None => println!(
            "Converted {} -> {} ({} bytes) in {:?}",
            conversion.from,
            conversion.to,
            conversion.bytes_written,
            start.elapsed()
        ),
    }

    Ok(())
}

fn cmd_fix_host(folder: &Path, guid: &str, backup: bool, converter: UesaveConverter) -> Result<()> {
    let pb = spinner(format!("Migrating host in {}", folder.display()))?;

    let start = Instant::now();
    let result = HostFix::new(&converter).backup(backup).run(folder, guid);
    pb.finish_and_clear();
    let report = result.context("Host migration failed")?;

    println!("Host player is now {}", report.guid);
    if report.world_entry_updated {
        println!("Updated world character {}", report.instance_id);
    } else {
        println!(
            "No world character has instance id {}; world characters left unchanged",
            report.instance_id
        );
    }
    println!("Completed in {:?}", start.elapsed());

    Ok(())
}

fn cmd_inspect(file: &Path) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let (header, save_type) = SaveHeader::parse(&data).context("Not a save container")?;

    println!("File:              {}", file.display());
    println!("Size:              {} bytes", data.len());
    println!("Save type:         {}", save_type);
    println!("Uncompressed size: {} bytes", header.uncompressed_len());
    println!("Compressed size:   {} bytes", header.compressed_len());

    let save = SavFile::parse(&data).context("Failed to decode save")?;
    println!("GVAS payload:      {} bytes", save.data().len());

    Ok(())
}
