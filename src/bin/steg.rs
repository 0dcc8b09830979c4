//! # Steg Binary Entry Point
//!
//! Hide a message in the transparent pixels of an image, read it back, or report
//! how much an image can hold.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin steg -- embed logo.png logo_secret.png --message "Secret" --verify
//! cargo run --bin steg -- extract logo_secret.png
//! cargo run --bin steg -- --threshold 8 capacity logo.png --json
//! ```
//!
//! Options are read from `--config` (TOML) first; command-line flags override them.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use altar_steg::common::config::{load_config, StegConfig};
use altar_steg::common::logging::init_logger;
use altar_steg::framing::{embed_message, extract_message};
use altar_steg::inspect::inspect;
use altar_steg::raster::codec::{load_bitmap, save_bitmap};
use altar_steg::Bitmap;

/// Command-line arguments for the steg binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    ///
    /// Example: config/steg.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pixels with alpha at or below this value carry payload
    #[arg(short, long)]
    threshold: Option<u8>,

    /// Make every written pixel fully opaque so carriers become visible
    #[arg(long)]
    reveal: bool,

    /// Convert input images to 32bpp RGBA before use
    #[arg(long)]
    force_rgba: bool,

    /// Log at DEBUG level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a message inside an image
    Embed {
        /// Carrier image
        input: PathBuf,
        /// Where to write the image holding the message
        output: PathBuf,
        /// Text to hide
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        message: Option<String>,
        /// File whose contents to hide
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Reload the written image and check the message reads back
        #[arg(long)]
        verify: bool,
    },
    /// Read a hidden message back
    Extract {
        input: PathBuf,
        /// Write the raw message here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report how many bytes an image can hide
    Capacity {
        input: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let mut config: StegConfig = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StegConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.stream.alpha_threshold = threshold;
    }
    config.stream.reveal_carriers |= args.reveal;
    config.image.force_rgba |= args.force_rgba;

    match args.command {
        Command::Embed {
            input,
            output,
            message,
            file,
            verify,
        } => {
            let payload = match (message, file) {
                (Some(text), _) => text.into_bytes(),
                (None, Some(path)) => {
                    fs::read(&path).with_context(|| format!("reading {}", path.display()))?
                }
                (None, None) => bail!("either --message or --file is required"),
            };
            embed(&config, &input, &output, &payload, verify)
        }
        Command::Extract { input, output } => extract(&config, &input, output.as_deref()),
        Command::Capacity { input, json } => capacity(&config, &input, json),
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

fn embed(config: &StegConfig, input: &Path, output: &Path, payload: &[u8], verify: bool) -> Result<()> {
    if verify && config.stream.reveal_carriers {
        bail!("--verify cannot be combined with --reveal: revealed pixels no longer count as carriers");
    }

    let mut bitmap = open_image(config, input)?;
    info!(
        "📷 Embedding {} bytes into {} ({}x{})",
        payload.len(),
        input.display(),
        bitmap.width(),
        bitmap.height()
    );

    embed_message(&mut bitmap, config.stream, payload)?;
    save_bitmap(&bitmap, output).with_context(|| format!("saving {}", output.display()))?;
    info!("✅ Wrote {}", output.display());

    if verify {
        let mut reloaded = open_image(config, output)?;
        let extracted = extract_message(&mut reloaded, config.stream)?;
        if extracted != payload {
            bail!("verification failed: extracted message differs from the input");
        }
        info!("✅ Verified: message reads back from {}", output.display());
    }

    Ok(())
}

fn extract(config: &StegConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let mut bitmap = open_image(config, input)?;
    let payload = extract_message(&mut bitmap, config.stream)
        .with_context(|| format!("extracting from {}", input.display()))?;

    match output {
        Some(path) => {
            fs::write(path, &payload).with_context(|| format!("writing {}", path.display()))?;
            info!("✅ Extracted {} bytes to {}", payload.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", String::from_utf8_lossy(&payload))?;
        }
    }
    Ok(())
}

fn capacity(config: &StegConfig, input: &Path, json: bool) -> Result<()> {
    let mut bitmap = open_image(config, input)?;
    let report = inspect(&mut bitmap, config.stream)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Image:            {}x{}, {} bpp", report.width, report.height, report.bits_per_pixel);
        println!("Alpha threshold:  {}", report.alpha_threshold);
        println!("Carrier pixels:   {}", report.carrier_pixels);
        println!("Capacity:         {} bytes", report.capacity_bytes);
        println!("Largest message:  {} bytes", report.max_message_bytes);
    }
    Ok(())
}

fn open_image(config: &StegConfig, path: &Path) -> Result<Bitmap> {
    load_bitmap(path, config.image.force_rgba).with_context(|| format!("loading {}", path.display()))
}
