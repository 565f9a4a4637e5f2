//! QKD Command-Line Interface
//!
//! Runs simulated BB84 key exchanges, optionally with an intercept-resend
//! eavesdropper, and uses the sifted key to encrypt a short binary message.
//!
//! ```text
//! qkd exchange -q 64 --eve -v
//! qkd survey -q 1000 --runs 50 --eve
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{exchange, survey, version};

/// Default message encrypted with the sifted key.
const DEFAULT_MESSAGE: &str = "1101011011";

/// qkd - BB84 quantum key distribution simulator
#[derive(Parser)]
#[command(name = "qkd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one key exchange and encrypt a message with the result
    Exchange {
        /// Number of qubits to send
        #[arg(short, long, env = "QKD_QUBITS")]
        qubits: usize,

        /// Place an intercept-resend eavesdropper on the channel
        #[arg(long)]
        eve: bool,

        /// Binary message to encrypt
        #[arg(short, long, default_value = DEFAULT_MESSAGE)]
        message: String,

        /// Seed for a reproducible run
        #[arg(long, env = "QKD_SEED")]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Estimate the error rate over many independent exchanges
    Survey {
        /// Number of qubits per exchange
        #[arg(short, long, env = "QKD_QUBITS")]
        qubits: usize,

        /// Number of exchanges
        #[arg(short, long, default_value = "100")]
        runs: usize,

        /// Place an intercept-resend eavesdropper on the channel
        #[arg(long)]
        eve: bool,

        /// Seed for a reproducible survey
        #[arg(long, env = "QKD_SEED")]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Exchange {
            qubits,
            eve,
            message,
            seed,
            format,
        } => exchange::execute(qubits, eve, &message, seed, &format, cli.verbose > 0),

        Commands::Survey {
            qubits,
            runs,
            eve,
            seed,
        } => survey::execute(qubits, runs, eve, seed),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
