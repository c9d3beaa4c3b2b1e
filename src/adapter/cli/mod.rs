pub mod commands;
mod state;

pub use state::{CliState, DynPrescriptionRepository};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Prescription records with 58mm thermal receipt output
#[derive(Parser)]
#[command(name = "fangji", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Database file (overrides configuration)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new prescription
    Add(AddArgs),

    /// List records, optionally filtered by patient name
    List {
        /// Patient name fragment to search for
        pattern: Option<String>,

        /// Show at most this many records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one record in full
    Show {
        id: String,

        /// Render the receipt text instead of the detail view
        #[arg(long)]
        receipt: bool,
    },

    /// Delete a record
    Delete {
        id: String,

        /// Skip the confirmation step
        #[arg(long)]
        yes: bool,
    },

    /// Archive a receipt file and send it to a printer
    Print {
        id: String,

        /// Printer name; auto-detects a receipt printer when omitted
        #[arg(long)]
        printer: Option<String>,

        /// Write the receipt file without sending it anywhere
        #[arg(long)]
        no_dispatch: bool,
    },

    /// Export all records to a file
    Export {
        path: PathBuf,

        /// Output format: csv or json
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Suggest frequently used terms mined from stored records
    Suggest {
        /// Keep only terms containing this fragment
        #[arg(long)]
        filter: Option<String>,

        /// Category: herbs, diagnoses, formulas, usages or all
        #[arg(long, default_value = "herbs")]
        category: String,

        /// Show at most this many terms
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List printers visible to the system
    Printers,

    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Patient name
    #[arg(short, long)]
    pub name: String,

    /// Patient gender
    #[arg(long, default_value = "男")]
    pub gender: String,

    /// Patient age
    #[arg(long, default_value = "")]
    pub age: String,

    /// Patient phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Diagnosis (中医辨证)
    #[arg(short, long, default_value = "")]
    pub diagnosis: String,

    /// Herb line such as "当归10克", repeatable
    #[arg(short = 'H', long = "herb", value_name = "LINE")]
    pub herbs: Vec<String>,

    /// Read herb lines from stdin, one per line
    #[arg(long, conflicts_with = "herbs")]
    pub stdin: bool,

    /// Usage directions; configured default when omitted
    #[arg(long)]
    pub usage: Option<String>,

    /// Prescribing doctor; configured default when omitted
    #[arg(long)]
    pub doctor: Option<String>,

    /// Doctor phone; configured default when omitted
    #[arg(long)]
    pub doctor_phone: Option<String>,

    /// Send the receipt to a printer after saving
    #[arg(short, long)]
    pub print: bool,

    /// Printer for --print
    #[arg(long, requires = "print")]
    pub printer: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print current settings as YAML
    Show,

    /// Change one setting
    Set { key: String, value: String },

    /// Apply a layout preset: minimal, standard or loose
    Preset { name: String },

    /// Print the settings file location
    Path,
}
