//! CLI for netpulse: scheduled home network health checks with CSV logging.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "netpulse")]
#[command(about = "netpulse: gateway, ping, speed-test, bufferbloat and Wi-Fi health checks")]
#[command(version = netpulse_core::VERSION)]
struct Cli {
    #[command(flatten)]
    overrides: commands::Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a check now, then every interval until Ctrl+C
    Run {
        /// Stop after this many cycles (0 = run until interrupted)
        #[arg(long, default_value = "0")]
        cycles: u64,
    },

    /// Run a single check and exit
    Once,

    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match commands::load_config(&cli.overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Run { cycles } => commands::run::run(config, cycles),
        Commands::Once => commands::once::run(config),
        Commands::Config => commands::config::run(&config),
    }
}
