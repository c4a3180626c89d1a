//! # Delivery Cost
//!
//! ```text
//! cost = cost_per_delivery × distinct categories
//!      + cost_per_product  × distinct products
//!      + fixed_cost
//! ```
//!
//! An empty cart ships nothing and costs nothing.

use basket_core::validation::validate_non_negative;
use basket_core::{CoreResult, Money, ShoppingCart};
use tracing::debug;

use crate::config::DeliverySettings;

/// Prices the delivery of a cart from its aggregates.
pub trait DeliveryCostCalculator {
    fn calculate_for(&self, cart: &ShoppingCart) -> Money;
}

/// The linear formula above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaDeliveryCost {
    cost_per_delivery: Money,
    cost_per_product: Money,
    fixed_cost: Money,
}

impl FormulaDeliveryCost {
    /// ## Errors
    /// `InvalidValue` when any component is negative.
    pub fn new(
        cost_per_delivery: Money,
        cost_per_product: Money,
        fixed_cost: Money,
    ) -> CoreResult<Self> {
        validate_non_negative("cost_per_delivery", cost_per_delivery.cents())?;
        validate_non_negative("cost_per_product", cost_per_product.cents())?;
        validate_non_negative("fixed_cost", fixed_cost.cents())?;

        Ok(FormulaDeliveryCost {
            cost_per_delivery,
            cost_per_product,
            fixed_cost,
        })
    }
}

impl TryFrom<&DeliverySettings> for FormulaDeliveryCost {
    type Error = basket_core::CoreError;

    fn try_from(settings: &DeliverySettings) -> Result<Self, Self::Error> {
        FormulaDeliveryCost::new(
            settings.cost_per_delivery,
            settings.cost_per_product,
            settings.fixed_cost,
        )
    }
}

impl DeliveryCostCalculator for FormulaDeliveryCost {
    fn calculate_for(&self, cart: &ShoppingCart) -> Money {
        if cart.is_empty() {
            return Money::zero();
        }

        let deliveries = cart.number_of_categories() as i64;
        let products = cart.number_of_products() as i64;
        let cost = self.cost_per_delivery * deliveries
            + self.cost_per_product * products
            + self.fixed_cost;

        debug!(cart_id = %cart.id(), deliveries, products, %cost, "Delivery cost calculated");
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{Category, Product, Quantity};
    use std::sync::Arc;

    fn formula() -> FormulaDeliveryCost {
        FormulaDeliveryCost::new(
            Money::from_cents(500),
            Money::from_cents(100),
            Money::from_cents(299),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_cart_costs_nothing() {
        assert_eq!(formula().calculate_for(&ShoppingCart::new()), Money::zero());
    }

    #[test]
    fn test_counts_distinct_categories_and_products() {
        let food = Arc::new(Category::root("Food").unwrap());
        let toys = Arc::new(Category::root("Toys").unwrap());
        let apple = Product::new("Apple", Money::from_units(1), Arc::clone(&food)).unwrap();
        let pear = Product::new("Pear", Money::from_units(1), food).unwrap();
        let ball = Product::new("Ball", Money::from_units(1), toys).unwrap();

        let mut cart = ShoppingCart::new();
        cart.add_product(&apple, Quantity::new(3).unwrap()).unwrap();
        cart.add_product(&pear, Quantity::new(1).unwrap()).unwrap();
        cart.add_product(&ball, Quantity::new(1).unwrap()).unwrap();
        cart.add_product(&apple, Quantity::new(2).unwrap()).unwrap();

        // 2 × 5.00 + 3 × 1.00 + 2.99
        assert_eq!(formula().calculate_for(&cart), Money::from_cents(1599));
    }

    #[test]
    fn test_rejects_negative_components() {
        let negative = Money::from_cents(-1);
        assert!(FormulaDeliveryCost::new(negative, Money::zero(), Money::zero()).is_err());

        let settings = DeliverySettings {
            fixed_cost: Money::from_cents(-5),
            ..DeliverySettings::default()
        };
        assert!(FormulaDeliveryCost::try_from(&settings).is_err());
    }
}
