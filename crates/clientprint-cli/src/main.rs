use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use clientprint_core::brand::synthesize_brand_header;
use clientprint_core::client_hints::{client_hint_headers, ChromiumVersion};
use clientprint_core::fingerprint::{
    compute_ja3, compute_ja3_with_rng, parse_akamai, parse_compact,
};
use clientprint_core::BrowserProfile;

#[derive(Parser)]
#[command(name = "clientprint")]
#[command(about = "Decode and synthesize TLS, HTTP/2 and client-hint fingerprints")]
struct Cli {
    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with compact JA3 strings
    Ja3 {
        #[command(subcommand)]
        action: Ja3Action,
    },

    /// Decode an Akamai HTTP/2 fingerprint string
    Akamai {
        /// e.g. 1:65536,2:0,4:6291456,6:262144|15663105|0|m,a,s,p
        fingerprint: String,
    },

    /// Print the sec-ch-ua value a Chromium release sends
    Brand {
        /// Embedder brand; leave empty for plain Chromium
        #[arg(long, default_value = "")]
        brand: String,
        /// Chromium major version
        #[arg(long)]
        major: u32,
        /// Use the pre-M103 GREASE spelling
        #[arg(long)]
        legacy: bool,
        /// Append .0.0.0 to real brand versions
        #[arg(long)]
        full_version: bool,
    },

    /// Print the client-hint request headers for a Chromium release
    Headers {
        /// Full Chromium version, e.g. 126.0.6478.127
        #[arg(long = "version")]
        chromium_version: String,
        /// Embedder brand [default: Google Chrome]
        #[arg(long, default_value = "")]
        brand: String,
        /// Include the high-entropy hints
        #[arg(long)]
        full: bool,
    },

    /// Build a browser profile from a saved PEET-style capture
    Import {
        /// Path to the capture JSON file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum Ja3Action {
    /// Decode a compact string into its canonical record
    Parse { fingerprint: String },

    /// Re-encode a compact string and hash it
    Format {
        fingerprint: String,
        /// Shuffle the non-terminal extensions
        #[arg(long)]
        shuffle: bool,
        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    match cli.command {
        Commands::Ja3 { action } => match action {
            Ja3Action::Parse { fingerprint } => {
                let fp = parse_compact(&fingerprint)
                    .with_context(|| format!("Failed to parse JA3 string {:?}", fingerprint))?;
                print_json(&fp, cli.pretty)?;
            }
            Ja3Action::Format {
                fingerprint,
                shuffle,
                seed,
            } => {
                let fp = parse_compact(&fingerprint)
                    .with_context(|| format!("Failed to parse JA3 string {:?}", fingerprint))?;
                let result = match seed {
                    Some(seed) => {
                        compute_ja3_with_rng(&fp, !shuffle, &mut StdRng::seed_from_u64(seed))
                    }
                    None => compute_ja3(&fp, !shuffle),
                };
                println!("{}", result.raw_string);
                println!("{}", result.hash);
            }
        },

        Commands::Akamai { fingerprint } => {
            let fp = parse_akamai(&fingerprint)
                .with_context(|| format!("Failed to parse HTTP/2 fingerprint {:?}", fingerprint))?;
            print_json(&fp, cli.pretty)?;
        }

        Commands::Brand {
            brand,
            major,
            legacy,
            full_version,
        } => {
            println!("{}", synthesize_brand_header(&brand, major, legacy, full_version));
        }

        Commands::Headers {
            chromium_version,
            brand,
            full,
        } => {
            let version = ChromiumVersion::parse(chromium_version);
            for (name, value) in client_hint_headers(&brand, &version, full) {
                println!("{}: {}", name, value);
            }
        }

        Commands::Import { file } => {
            let profile = BrowserProfile::from_peet_file(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            print_json(&profile, cli.pretty)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
