use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_CATALOG, DEFAULT_DB_URL};

/// Offline course viewer: local course store, lesson progress and CSV export.
#[derive(Debug, Parser)]
#[command(name = "learnpod", version, about)]
pub struct Cli {
    /// SQLite database URL or path (`memory` for a throwaway store)
    #[arg(long, global = true, env = "LEARNPOD_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db: String,

    /// Remote catalog location: a JSON file path or an http(s) URL
    #[arg(long, global = true, env = "LEARNPOD_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: String,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List downloaded courses, or the remote catalog if none are downloaded
    Catalog {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Save a catalog course for offline use
    Download { course_id: String },
    /// Upload course JSON from a file (`-` reads stdin)
    Import { file: PathBuf },
    /// Show a course with lesson numbers and completion marks
    Show { course_id: String },
    /// Mark a lesson complete, or incomplete if it already is
    Toggle { course_id: String, lesson_id: String },
    /// Write all progress as a CSV report
    Export {
        /// Directory the report is written into
        #[arg(long, env = "LEARNPOD_EXPORT_DIR", default_value = ".")]
        out_dir: PathBuf,
        /// Print the CSV to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Remove a downloaded course (its progress is kept)
    Delete { course_id: String },
}
