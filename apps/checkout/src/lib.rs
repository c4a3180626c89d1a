//! # Basket Checkout Library
//!
//! Loads a storefront and a cart from a scenario file, submits the cart
//! through the discount engine, and prints the receipt.
//!
//! ## Module Organization
//! ```text
//! basket_checkout_lib/
//! ├── lib.rs          ◄─── You are here (run & tracing setup)
//! ├── cli.rs          ◄─── Command line definition
//! ├── config.rs       ◄─── CheckoutConfig (TOML + env)
//! ├── scenario.rs     ◄─── Scenario files → Storefront
//! ├── client.rs       ◄─── CartClient orchestrator
//! ├── delivery.rs     ◄─── Delivery cost formula
//! └── error.rs        ◄─── AppError
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod delivery;
pub mod error;
pub mod scenario;

use basket_core::ShoppingCart;
use basket_store::InMemoryCartRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, SubmitArgs};
use client::{CartClient, Receipt};
use config::{CheckoutConfig, OutputFormat};
use delivery::FormulaDeliveryCost;
use error::{AppError, AppResult};
use scenario::{Scenario, Storefront};

/// Runs the checkout for a parsed command line.
///
/// ## Submit Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                         basket-checkout submit                          │
/// │                                                                         │
/// │  1. Initialize Logging ─────── RUST_LOG, default info,basket=debug     │
/// │  2. Load Configuration ─────── defaults → checkout.toml → BASKET_*      │
/// │  3. Load Scenario ──────────── TOML → Storefront (catalogs resolved)   │
/// │  4. Build CartClient ───────── campaigns, then redeemed coupons        │
/// │  5. Fill & Submit Cart ─────── provide → apply → deliver → save        │
/// │  6. Print Receipt ──────────── text or JSON on stdout                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(cli: Cli) -> AppResult<()> {
    init_tracing();

    let config = CheckoutConfig::load(cli.config.clone())?;

    match cli.command {
        Command::Submit(args) => {
            let receipt = submit(&config, &args)?;
            let format = if args.json {
                OutputFormat::Json
            } else {
                config.output
            };
            println!("{}", render(&receipt, format)?);
        }
        Command::InitConfig { force } => {
            let path = cli
                .config
                .or_else(CheckoutConfig::default_config_path)
                .ok_or_else(|| AppError::Config("No config path available".into()))?;
            if path.exists() && !force {
                return Err(AppError::Config(format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                )));
            }
            let path = CheckoutConfig::default().save(Some(path))?;
            println!("{}", path.display());
        }
        Command::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Loads the scenario named by `args` (or the config) and submits its cart.
pub fn submit(config: &CheckoutConfig, args: &SubmitArgs) -> AppResult<Receipt> {
    let path = args
        .scenario
        .clone()
        .or_else(|| config.scenario.clone())
        .ok_or_else(|| {
            AppError::Config("No scenario given on the command line or in the config".into())
        })?;

    let scenario = Scenario::load(&path)?;
    submit_scenario(config, scenario, !args.no_delivery)
}

/// Resolves `scenario` and submits its cart.
pub fn submit_scenario(
    config: &CheckoutConfig,
    scenario: Scenario,
    price_delivery: bool,
) -> AppResult<Receipt> {
    let storefront = Storefront::try_from(scenario)?;
    let root = storefront.root_provider(&storefront.cart.coupons)?;

    let mut builder = CartClient::builder(root)
        .products(storefront.products.clone())
        .repository(InMemoryCartRepository::new());
    if config.delivery.enabled && price_delivery {
        builder = builder.delivery(FormulaDeliveryCost::try_from(&config.delivery)?);
    }
    let mut client = builder.build()?;

    let mut cart = ShoppingCart::new();
    for line in &storefront.cart.lines {
        client.add_product(&mut cart, &line.product, line.quantity)?;
    }

    info!(
        cart_id = %cart.id(),
        lines = storefront.cart.lines.len(),
        coupons = storefront.cart.coupons.len(),
        "Cart filled from scenario"
    );
    client.submit(cart)
}

/// Renders a receipt in the requested format.
pub fn render(receipt: &Receipt, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(receipt.to_string()),
        OutputFormat::Json => Ok(receipt.summary().to_json()?),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=basket_core=trace` - Trace the engine only
/// - Default: INFO, DEBUG for basket crates
///
/// Logs go to stderr so JSON receipts on stdout stay parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,basket=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::Money;

    const SCENARIO: &str = r#"
        [[categories]]
        title = "Food"

        [[categories]]
        title = "Toys"

        [[products]]
        title = "Apple"
        price = 1000
        category = "Food"

        [[products]]
        title = "Ball"
        price = 500
        category = "Toys"

        [[campaigns]]
        name = "ten-percent"
        discount = { kind = "cart_rate", threshold = 1000, rate = 1000 }

        [[campaigns]]
        name = "small-basket"
        discount_name = "min-cart"
        discount = { kind = "cart_amount", threshold = 1000, amount = 300 }

        [[campaigns]]
        name = "big-basket"
        discount_name = "min-cart"
        discount = { kind = "cart_amount", threshold = 5000, amount = 700 }

        [[coupons]]
        code = "SAVE5"
        discount = { kind = "fixed", amount = 500 }

        [[coupons]]
        code = "UNUSED"
        discount = { kind = "fixed", amount = 9900 }

        [cart]
        lines = [
            { product = "Apple", quantity = 6 },
            { product = "Ball", quantity = 1 },
        ]
        coupons = ["SAVE5"]
    "#;

    fn no_delivery() -> CheckoutConfig {
        let mut config = CheckoutConfig::default();
        config.delivery.enabled = false;
        config
    }

    #[test]
    fn test_submit_scenario_end_to_end() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let receipt = submit_scenario(&no_delivery(), scenario, true).unwrap();
        let cart = receipt.cart();

        // 65.00 - 6.50 (10%) - 7.00 (big basket wins min-cart) - 5.00 (coupon)
        assert_eq!(cart.cart_amount_without_discount(), Money::from_cents(6500));
        assert_eq!(cart.total_discount(), Money::from_cents(1850));
        assert_eq!(cart.total_amount(), Money::from_cents(4650));

        let names: Vec<&str> = receipt
            .summary()
            .discounts
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["ten-percent", "min-cart", "SAVE5"]);
    }

    #[test]
    fn test_delivery_follows_config() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let receipt = submit_scenario(&CheckoutConfig::default(), scenario.clone(), true).unwrap();
        // 2 categories × 5.00 + 2 products × 1.00 + 2.99
        assert_eq!(receipt.cart().delivery_cost(), Money::from_cents(1499));
        assert_eq!(receipt.cart().total_amount(), Money::from_cents(6149));

        let receipt = submit_scenario(&CheckoutConfig::default(), scenario, false).unwrap();
        assert_eq!(receipt.cart().delivery_cost(), Money::zero());
    }

    #[test]
    fn test_render_formats() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let receipt = submit_scenario(&no_delivery(), scenario, true).unwrap();

        let text = render(&receipt, OutputFormat::Text).unwrap();
        assert!(text.contains("Total amount"));
        assert!(text.contains("$46.50"));

        let json = render(&receipt, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_amount"], 4650);
    }

    #[test]
    fn test_submit_without_scenario_is_config_error() {
        let args = SubmitArgs {
            scenario: None,
            json: false,
            no_delivery: false,
        };
        let err = submit(&CheckoutConfig::default(), &args).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_unknown_cart_product_aborts() {
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        scenario.cart.lines[0].product = "Plum".to_string();

        let err = submit_scenario(&no_delivery(), scenario, true).unwrap_err();
        assert_eq!(err.to_string(), "Product not found: Plum");
    }

    #[test]
    fn test_overflowing_cart_line_is_an_error() {
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let huge = basket_core::Quantity::new(92_233_720_368_547_758).unwrap();
        scenario.cart.lines[0].quantity = huge;

        let err = submit_scenario(&no_delivery(), scenario, true).unwrap_err();
        assert!(matches!(err, AppError::Core(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_bundled_scenario_parses() {
        let scenario = Scenario::from_toml_str(include_str!("../scenarios/default.toml")).unwrap();
        assert!(submit_scenario(&no_delivery(), scenario, true).is_ok());
    }
}
