//! # Cart Summary
//!
//! A detached, printable snapshot of a cart.
//!
//! The text layout is fixed and depends only on the cart's contents; the
//! cart id is left to the JSON form:
//! ```text
//! [Food]
//!   Apple                      6 x      $10.00 =      $60.00
//! Subtotal                                            $60.00
//! Discount campaign                                    $6.00
//! Discount coupon                                      $5.00
//! Total discount                                      $11.00
//! Cart amount                                         $49.00
//! Delivery cost                                        $0.00
//! Total amount                                        $49.00
//! ```
//!
//! The same structure serializes to JSON for machine consumers.

use serde::Serialize;
use std::fmt;

use crate::cart::ShoppingCart;
use crate::money::Money;
use crate::quantity::Quantity;

/// One line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSummary {
    pub product: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub total_price: Money,
}

/// The lines belonging to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub lines: Vec<LineSummary>,
}

/// One winning discount and what it realized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountSummary {
    pub name: String,
    pub amount: Money,
}

/// Everything the receipt shows, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub cart_id: String,
    pub categories: Vec<CategorySummary>,
    pub subtotal: Money,
    pub discounts: Vec<DiscountSummary>,
    pub total_discount: Money,
    pub cart_amount: Money,
    pub delivery_cost: Money,
    pub total_amount: Money,
}

impl CartSummary {
    /// Serializes the summary as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&ShoppingCart> for CartSummary {
    fn from(cart: &ShoppingCart) -> Self {
        let categories = cart
            .categories()
            .into_iter()
            .map(|category| CategorySummary {
                category: category.title().to_string(),
                lines: cart
                    .items_in_category(category)
                    .map(|item| LineSummary {
                        product: item.product().title().to_string(),
                        quantity: item.quantity(),
                        unit_price: item.unit_price(),
                        total_price: item.total_price(),
                    })
                    .collect(),
            })
            .collect();

        let discounts = cart
            .discounts()
            .map(|applied| DiscountSummary {
                name: applied.name().to_string(),
                amount: applied.amount(),
            })
            .collect();

        CartSummary {
            cart_id: cart.id().to_string(),
            categories,
            subtotal: cart.cart_amount_without_discount(),
            discounts,
            total_discount: cart.total_discount(),
            cart_amount: cart.cart_amount(),
            delivery_cost: cart.delivery_cost(),
            total_amount: cart.total_amount(),
        }
    }
}

fn total_row(f: &mut fmt::Formatter<'_>, label: &str, amount: Money) -> fmt::Result {
    writeln!(f, "{:<40}{:>16}", label, amount.to_string())
}

impl fmt::Display for CartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.categories {
            writeln!(f, "[{}]", section.category)?;
            for line in &section.lines {
                writeln!(
                    f,
                    "  {:<20}{:>6} x {:>11} = {:>11}",
                    line.product,
                    line.quantity,
                    line.unit_price.to_string(),
                    line.total_price.to_string()
                )?;
            }
        }

        total_row(f, "Subtotal", self.subtotal)?;
        for discount in &self.discounts {
            total_row(f, &format!("Discount {}", discount.name), discount.amount)?;
        }
        total_row(f, "Total discount", self.total_discount)?;
        total_row(f, "Cart amount", self.cart_amount)?;
        total_row(f, "Delivery cost", self.delivery_cost)?;
        total_row(f, "Total amount", self.total_amount)
    }
}
