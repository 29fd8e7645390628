use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::parking::VehicleClass;

/// File name of the assignment log when no explicit path is configured.
pub const DEFAULT_LOG_NAME: &str = "plate_numbers.txt";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    /// Path to a YAML config file. Defaults apply when omitted.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the occupancy of every spot.
    Status {
        /// Restrict the listing to one vehicle class.
        #[arg(long, value_enum)]
        class: Option<VehicleClass>,
        /// Print the snapshot as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Park a vehicle, either on the lowest free spot or on a chosen one.
    Park {
        #[arg(value_enum)]
        class: VehicleClass,
        plate: String,
        /// Use this spot instead of the lowest free one.
        #[arg(long)]
        spot: Option<u32>,
    },
    /// List the free spot ids of one vehicle class.
    Free {
        #[arg(value_enum)]
        class: VehicleClass,
    },
    /// Release an occupied spot.
    Leave {
        #[arg(value_enum)]
        class: VehicleClass,
        spot: u32,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub capacity: Capacity,
    /// Explicit location of the assignment log. When unset, the log lives at
    /// `<output_dir>/plate_numbers.txt`.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    pub fn from_file(path: &Path) -> Self {
        let reader = BufReader::new(File::open(path).unwrap_or_else(|e| {
            panic!(
                "Failed to open config file at {:?}. Original error was {}",
                path, e
            );
        }));
        serde_yaml::from_reader(reader).unwrap_or_else(|e| {
            panic!(
                "Failed to parse config at {:?}. Original error was: {}",
                path, e
            )
        })
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => path.clone(),
            None => self.output.output_dir.join(DEFAULT_LOG_NAME),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    #[serde(default = "default_capacity")]
    pub car: u32,
    #[serde(default = "default_capacity")]
    pub motorcycle: u32,
}

impl Capacity {
    pub fn of(&self, class: VehicleClass) -> u32 {
        match class {
            VehicleClass::Car => self.car,
            VehicleClass::Motorcycle => self.motorcycle,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity {
            car: default_capacity(),
            motorcycle: default_capacity(),
        }
    }
}

fn default_capacity() -> u32 {
    50
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Output {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            output_dir: default_output_dir(),
            logging: Logging::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Extra switch for the file log, as the tracing subscriber itself has no
/// off value that could be parsed from the config.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum Logging {
    #[default]
    None,
    Info,
}
