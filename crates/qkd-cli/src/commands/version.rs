//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - BB84 quantum key distribution simulator",
        style("qkd").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qkd-core  Qubit simulation, participants, sifting and key statistics");
    println!("  qkd-cli   Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
