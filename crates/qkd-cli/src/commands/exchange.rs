//! Exchange command implementation.
//!
//! Runs one BB84 exchange, encrypts the message with the sender's sifted key
//! and decrypts it with the receiver's.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qkd_core::basis::{format_bases, format_bits};
use qkd_core::{ExchangeConfig, ExchangeOutcome, cipher, run_exchange_with_rng};

use super::common::{exchange_config, format_rate, make_rng, print_channel};

/// Message round trip through the XOR cipher.
#[derive(Debug, Serialize)]
pub struct CipherReport {
    pub message: String,
    pub encrypted: String,
    pub decrypted: String,
    /// Whether the decrypted message matches the original.
    pub success: bool,
}

impl CipherReport {
    /// Encrypt with the sender key, decrypt with the receiver key.
    pub fn from_outcome(message: &str, outcome: &ExchangeOutcome) -> Result<Self> {
        if outcome.key_len() == 0 {
            anyhow::bail!("No basis matches: the sifted key is empty, nothing to encrypt with");
        }
        let encrypted = cipher::encrypt(message, &outcome.sender_key)
            .with_context(|| format!("Failed to encrypt message '{message}'"))?;
        let decrypted = cipher::decrypt(&encrypted, &outcome.receiver_key)?;
        Ok(Self {
            success: decrypted == message,
            message: message.to_string(),
            encrypted,
            decrypted,
        })
    }
}

#[derive(Serialize)]
struct ExchangeReport<'a> {
    config: &'a ExchangeConfig,
    error_rate: f64,
    outcome: &'a ExchangeOutcome,
    cipher: &'a CipherReport,
}

/// Execute the exchange command.
pub fn execute(
    qubits: usize,
    eve: bool,
    message: &str,
    seed: Option<u64>,
    format: &str,
    verbose: bool,
) -> Result<()> {
    let config = exchange_config(qubits, eve)?;
    let mut rng = make_rng(seed);

    let outcome = run_exchange_with_rng(&config, &mut rng)?;
    let report = CipherReport::from_outcome(message, &outcome)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&ExchangeReport {
                config: &config,
                error_rate: outcome.error_rate(),
                outcome: &outcome,
                cipher: &report,
            })
            .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        "table" => print_exchange(&config, &outcome, &report, verbose),
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }

    Ok(())
}

fn print_exchange(
    config: &ExchangeConfig,
    outcome: &ExchangeOutcome,
    report: &CipherReport,
    verbose: bool,
) {
    println!("{} BB84 exchange", style("→").cyan().bold());
    print_channel(config);

    if verbose {
        let t = &outcome.transcript;
        println!();
        println!("  Alice bits:  {}", format_bits(&t.sender_bits));
        println!("  Alice bases: {}", format_bases(&t.sender_bases));
        if let (Some(bases), Some(bits)) = (&t.eavesdropper_bases, &t.intercepted_bits) {
            println!("  Eve bases:   {}", style(format_bases(bases)).red());
            println!("  Eve bits:    {}", style(format_bits(bits)).red());
        }
        println!("  Bob bases:   {}", format_bases(&t.receiver_bases));
        println!("  Bob bits:    {}", format_bits(&t.receiver_bits));
    }

    println!();
    println!("  Original message:  {}", style(&report.message).cyan());
    println!("  Encrypted message: {}", style(&report.encrypted).yellow());
    println!("  Decrypted message: {}", style(&report.decrypted).cyan());

    if report.success {
        println!(
            "\n{} Decryption successful! The decrypted message matches the original.",
            style("✓").green().bold()
        );
    } else {
        println!(
            "\n{} Decryption failed! The decrypted message does not match the original.",
            style("✗").red().bold()
        );
    }

    println!();
    println!("  Basis matches: {}", style(outcome.key_len()).yellow());
    println!("  Alice's key:   {}", format_bits(&outcome.sender_key));
    println!("  Bob's key:     {}", format_bits(&outcome.receiver_key));
    println!("  Entropy:       {:.6}", outcome.entropy);
    println!("  Fidelity:      {}", outcome.fidelity);
    println!(
        "  Error rate:    {} ({} of {} sifted bits)",
        style(format_rate(outcome.error_rate())).yellow(),
        outcome.mismatch_count(),
        outcome.key_len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use qkd_core::basis::bases_from_bits;
    use qkd_core::{ExchangeChoices, run_exchange};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_cipher_report_untapped() {
        let outcome = run_exchange(128, false).unwrap();
        let report = CipherReport::from_outcome("1101011011", &outcome).unwrap();
        assert!(report.success);
        assert_eq!(report.decrypted, "1101011011");
        assert_eq!(report.encrypted.len(), 10);
    }

    #[test]
    fn test_cipher_report_empty_key() {
        let choices = ExchangeChoices {
            sender_bits: vec![0, 1],
            sender_bases: bases_from_bits(&[0, 0]).unwrap(),
            eavesdropper_bases: None,
            receiver_bases: bases_from_bits(&[1, 1]).unwrap(),
        };
        let outcome = choices
            .execute_with_rng(&mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(CipherReport::from_outcome("1", &outcome).is_err());
    }

    #[test]
    fn test_cipher_report_bad_message() {
        let outcome = run_exchange(64, false).unwrap();
        assert!(CipherReport::from_outcome("10x", &outcome).is_err());
    }

    #[test]
    fn test_execute_rejects_unknown_format() {
        assert!(execute(32, false, "1", Some(1), "yaml", false).is_err());
    }
}
