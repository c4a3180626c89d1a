//! Command line interface of the checkout binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve discounts for a cart and print the receipt.
#[derive(Debug, Parser)]
#[command(name = "basket-checkout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit the cart described by a scenario file
    Submit(SubmitArgs),

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    ShowConfig,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Scenario file (falls back to `scenario` in the config)
    pub scenario: Option<PathBuf>,

    /// Print the receipt as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip delivery pricing
    #[arg(long)]
    pub no_delivery: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit() {
        let cli =
            Cli::try_parse_from(["basket-checkout", "submit", "cart.toml", "--json"]).unwrap();
        match cli.command {
            Command::Submit(args) => {
                assert_eq!(args.scenario, Some(PathBuf::from("cart.toml")));
                assert!(args.json);
                assert!(!args.no_delivery);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["basket-checkout", "show-config", "--config", "c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Command::ShowConfig));
    }
}
