//! Shared helpers for CLI commands.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use qkd_core::ExchangeConfig;

/// Build the exchange configuration from command-line flags.
pub fn exchange_config(qubits: usize, eve: bool) -> Result<ExchangeConfig> {
    let config = ExchangeConfig::new(qubits).with_eavesdropper(eve);
    config.validate()?;
    Ok(config)
}

/// Seeded RNG when a seed is given, OS-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!(seed, "using seeded RNG");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Format an error rate as a percentage.
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Print the channel banner shared by the exchange and survey commands.
pub fn print_channel(config: &ExchangeConfig) {
    let channel = if config.eavesdropper {
        style("tapped (intercept-resend)").red()
    } else {
        style("untapped").green()
    };
    println!("  Qubits:  {}", config.qubit_count);
    println!("  Channel: {channel}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(exchange_config(0, false).is_err());
        assert!(exchange_config(1, true).unwrap().eavesdropper);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let a: u64 = make_rng(Some(3)).r#gen();
        let b: u64 = make_rng(Some(3)).r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.25), "25.00%");
        assert_eq!(format_rate(0.0), "0.00%");
    }
}
