//! CLI definition using clap

use carpark_types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "carpark")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Parking lot entry/exit tracking from number plate sightings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Keep sessions in memory only (nothing is written to the data dir)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides config and CARPARK_BIND)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Read the plate from a vehicle photo and record the sighting
    Scan {
        /// Path to image file
        image: PathBuf,

        /// Only print the recognized plate
        #[arg(long)]
        dry_run: bool,
    },

    /// Record a sighting of a plate typed by hand
    Record {
        /// Number plate, e.g. MH12AB1234
        plate: String,
    },

    /// Show the record for a plate
    Show {
        plate: String,
    },

    /// List all records
    List {
        /// Only vehicles currently inside
        #[arg(long)]
        parked: bool,
    },

    /// Delete the record for a plate
    Remove {
        plate: String,
    },

    /// Export all records to CSV
    Export {
        /// Output file
        #[arg(long, short = 'o', default_value = "sessions.csv")]
        output: PathBuf,
    },

    /// Show or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set server bind address
        #[arg(long)]
        set_bind: Option<String>,

        /// Set charge per started hour
        #[arg(long)]
        set_rate: Option<i64>,

        /// Set session data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set plate reader backend (gemini, command)
        #[arg(long)]
        set_reader: Option<String>,

        /// Set Gemini model
        #[arg(long)]
        set_model: Option<String>,

        /// Set local OCR command
        #[arg(long)]
        set_command: Option<String>,

        /// Set vehicle registry backend (rto-api, vehicle-master, none)
        #[arg(long)]
        set_registry: Option<String>,

        /// Set vehicle master TOML file
        #[arg(long)]
        set_vehicles_file: Option<PathBuf>,

        /// Enable/disable recognition cache
        #[arg(long)]
        set_cache: Option<bool>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage the recognition cache
    Cache {
        /// Remove all cached recognitions
        #[arg(long)]
        clear: bool,

        /// Show cache statistics
        #[arg(long)]
        stats: bool,
    },
}
