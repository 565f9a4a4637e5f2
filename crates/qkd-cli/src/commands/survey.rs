//! Survey command implementation.
//!
//! Repeats independent exchanges and pools their error statistics, which is
//! how intercept-resend shows up: ~25% errors instead of none. The rate is
//! total mismatches over total sifted bits across every run.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qkd_core::survey_error_rate_with;

use super::common::{exchange_config, format_rate, make_rng, print_channel};

/// Execute the survey command.
pub fn execute(qubits: usize, runs: usize, eve: bool, seed: Option<u64>) -> Result<()> {
    let config = exchange_config(qubits, eve)?;
    let mut rng = make_rng(seed);

    println!("{} Surveying {} exchanges", style("→").cyan().bold(), runs);
    print_channel(&config);

    let progress = ProgressBar::new(runs as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?,
    );

    let report = survey_error_rate_with(&config, runs, &mut rng, |report| {
        progress.set_message(format_rate(report.error_rate()));
        progress.inc(1);
    });
    progress.finish_and_clear();
    let report = report?;

    println!(
        "\n{} Survey complete ({} runs):",
        style("✓").green().bold(),
        report.runs
    );
    println!("  Sifted bits: {}", report.sifted_bits);
    println!("  Mismatches:  {}", report.mismatches);
    println!(
        "  Error rate:  {}",
        style(format_rate(report.error_rate())).yellow()
    );

    Ok(())
}
