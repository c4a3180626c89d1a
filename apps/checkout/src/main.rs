//! # Basket Checkout Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging, to stderr)
//! 3. Load configuration (defaults → checkout.toml → BASKET_* env)
//! 4. Run the command; errors go to stderr with a non-zero exit code

use clap::Parser;

use basket_checkout_lib::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // The actual setup is in lib.rs for better testability
    if let Err(err) = basket_checkout_lib::run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(err.exit_code());
    }
}
