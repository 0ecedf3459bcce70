//! litra CLI: command-line control for Logitech Litra lights.

use anyhow::Result;
use clap::{Parser, Subcommand};
use litra_core::config::{self, ConfigFile};
use litra_core::controller::Controller;
use litra_core::registry::DeviceRegistry;
use litra_core::transport::HidApiBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "litra", version, about = "Control Logitech Litra Glow and Beam lights")]
struct Cli {
    /// State file (defaults to <config dir>/litra/config.json).
    #[arg(long, global = true, env = config::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn every light on.
    On,
    /// Turn every light off.
    Off,
    /// Set brightness on every light (1-100).
    Brightness {
        /// Brightness percentage. Not clamped.
        #[arg(allow_negative_numbers = true)]
        level: i32,
    },
    /// Set color temperature on every light (2700-6500 K).
    Temperature {
        /// Temperature in Kelvin.
        kelvin: u16,
    },
    /// Print the number of connected lights.
    Count,
    /// List connected lights.
    List,
    /// Show the last brightness and temperature that were set.
    State,
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config_file(path: Option<PathBuf>) -> Result<ConfigFile> {
    match path {
        Some(path) => Ok(ConfigFile::new(path)),
        None => Ok(ConfigFile::open_default()?),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let backend = HidApiBackend::new()?;
    let registry = DeviceRegistry::discover(&backend)?;
    let controller = Controller::new(&backend, &registry);
    tracing::debug!(count = controller.count(), "Discovery finished");

    match cli.command {
        Commands::On => controller.light_on()?,
        Commands::Off => controller.light_off()?,
        Commands::Brightness { level } => {
            let mut file = config_file(cli.config)?;
            controller.set_brightness(level, &mut file)?;
        }
        Commands::Temperature { kelvin } => {
            let mut file = config_file(cli.config)?;
            controller.set_temperature(kelvin, &mut file)?;
        }
        Commands::Count => println!("{}", controller.count()),
        Commands::List => {
            if registry.is_empty() {
                println!("No Litra lights found.");
                println!("Ensure the light is connected and you have access to its hidraw device.");
            }
            for (index, dev) in registry.iter().enumerate() {
                println!(
                    "{index}: {} (serial: {}, path: {})",
                    dev.display_name(),
                    dev.serial,
                    dev.path
                );
            }
        }
        Commands::State => {
            let state = config_file(cli.config)?.load()?.current_state;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_brightness() {
        let cli = Cli::try_parse_from(["litra", "brightness", "50"]).unwrap();
        assert!(matches!(cli.command, Commands::Brightness { level: 50 }));
    }

    #[test]
    fn brightness_is_not_clamped_at_parse_time() {
        let cli = Cli::try_parse_from(["litra", "brightness", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Brightness { level: -5 }));
    }

    #[test]
    fn temperature_must_fit_u16() {
        assert!(Cli::try_parse_from(["litra", "temperature", "6500"]).is_ok());
        assert!(Cli::try_parse_from(["litra", "temperature", "70000"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["litra", "on", "-vv", "--config", "/tmp/litra.json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/litra.json")));
    }
}
