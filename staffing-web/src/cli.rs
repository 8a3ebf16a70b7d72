//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;

/// Staffing planner backed by a Google spreadsheet
#[derive(Parser, Debug)]
#[command(name = "staffing-web")]
#[command(about = "Record people, projects and monthly assignments in a Google spreadsheet", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Service-account key file [env: GOOGLE_SERVICE_ACCOUNT_FILE]
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Spreadsheet id [env: SPREADSHEET_ID]
    #[arg(long, global = true)]
    pub spreadsheet_id: Option<String>,

    /// Timeout for spreadsheet requests, in seconds [env: STAFFING_TIMEOUT_SECS]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the web application (default)
    Serve {
        /// Address to listen on [env: STAFFING_BIND]
        #[arg(long)]
        bind: Option<String>,
    },

    /// Write all three tables to an Excel workbook
    Export {
        /// Destination file
        #[arg(short, long, default_value = "assignments.xlsx")]
        output: PathBuf,
    },

    /// Append assignments from a CSV file
    Import {
        /// CSV file with Person, Project, Month and Fraction columns
        file: PathBuf,
    },
}

impl Cli {
    /// Subcommand to run; `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Serve { bind: None })
    }

    pub fn overrides(&self) -> ConfigOverrides {
        let bind = match &self.command {
            Some(Commands::Serve { bind }) => bind.clone(),
            _ => None,
        };
        ConfigOverrides {
            credentials_path: self.credentials.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            bind,
            timeout_secs: self.timeout,
        }
    }
}
