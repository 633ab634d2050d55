//! CLI argument definitions using clap
//!
//! Commands:
//! - schema-builder show --config <path>
//! - schema-builder form --config <path>
//! - schema-builder validate --config <path> --data <file>
//! - schema-builder session --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schema-builder - edit a JSON-schema-like tree and derive forms from it
#[derive(Parser, Debug)]
#[command(name = "schema-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log every store operation (overrides the configured log level)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the normalized schema
    Show {
        /// Path to configuration file
        #[arg(long, default_value = "./schema-builder.json")]
        config: PathBuf,
    },

    /// Print the form layout and its initial data
    Form {
        /// Path to configuration file
        #[arg(long, default_value = "./schema-builder.json")]
        config: PathBuf,
    },

    /// Validate a form-data document against the schema
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./schema-builder.json")]
        config: PathBuf,

        /// Form-data JSON file
        #[arg(long)]
        data: PathBuf,
    },

    /// Edit the schema through line-delimited JSON requests on stdin
    Session {
        /// Path to configuration file
        #[arg(long, default_value = "./schema-builder.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "schema-builder",
            "validate",
            "--config",
            "cfg.json",
            "--data",
            "data.json",
        ])
        .unwrap();

        assert!(!cli.verbose);
        match cli.command {
            Command::Validate { config, data } => {
                assert_eq!(config, PathBuf::from("cfg.json"));
                assert_eq!(data, PathBuf::from("data.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_and_global_verbose() {
        let cli = Cli::try_parse_from(["schema-builder", "show", "--verbose"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Show { config } => {
                assert_eq!(config, PathBuf::from("./schema-builder.json"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
