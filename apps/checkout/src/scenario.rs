//! # Scenario Files
//!
//! A scenario describes a storefront (categories, products, campaigns,
//! coupons) and one cart to submit against it.
//!
//! ## File Format
//! ```toml
//! [[categories]]
//! title = "Food"
//!
//! [[categories]]
//! title = "Fruit"
//! parent = "Food"            # parents must be declared first
//!
//! [[products]]
//! title = "Apple"
//! price = 1000               # cents
//! category = "Fruit"
//!
//! [[campaigns]]
//! name = "fruit-week"
//! start = "2024-01-01T00:00:00Z"
//! finish = "2030-01-01T00:00:00Z"
//! discount = { kind = "category_rate", category = "Fruit", minimum_quantity = 3, rate = 1000 }
//!
//! [[coupons]]
//! code = "SAVE5"
//! discount = { kind = "cart_amount", threshold = 10000, amount = 500 }
//!
//! [cart]
//! lines = [{ product = "Apple", quantity = 6 }]
//! coupons = ["SAVE5"]
//! ```
//!
//! Campaigns and coupons compete under their `discount_name` when one is
//! given, otherwise under their own name/code.
//!
//! ## Conversion
//! ```text
//! Scenario (serde) ──TryFrom──► Storefront ──root_provider()──► Group
//!                                                                ├── campaigns
//!                                                                └── coupons
//! ```

use basket_core::{
    Category, Discount, DiscountGroup, DiscountItem, Money, Product, Quantity, Rate, ValidityWindow,
};
use basket_store::{Catalog, Lookup};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

// =============================================================================
// File Model
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDef {
    pub title: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductDef {
    pub title: String,
    pub price: Money,
    pub category: String,
}

/// The discount rule, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountDef {
    QuantityThreshold {
        minimum_quantity: Quantity,
        amount: Money,
    },
    ProductType {
        product: String,
        amount: Money,
    },
    CategoryAmount {
        category: String,
        minimum_quantity: Quantity,
        amount: Money,
    },
    CategoryRate {
        category: String,
        minimum_quantity: Quantity,
        rate: Rate,
    },
    CartAmount {
        threshold: Money,
        amount: Money,
    },
    CartRate {
        threshold: Money,
        rate: Rate,
    },
    Fixed {
        amount: Money,
    },
}

impl DiscountDef {
    /// Resolves references and builds the engine discount.
    ///
    /// ## Errors
    /// - `Store(NotFound)` for an unknown product or category
    /// - `Core(InvalidValue)` for a blank name or a non-positive amount
    pub fn build(
        &self,
        name: &str,
        categories: &impl Lookup<Arc<Category>>,
        products: &impl Lookup<Product>,
    ) -> AppResult<Discount> {
        let discount = match self {
            DiscountDef::QuantityThreshold {
                minimum_quantity,
                amount,
            } => Discount::quantity_threshold(name, *minimum_quantity, *amount)?,
            DiscountDef::ProductType { product, amount } => {
                Discount::product_type(name, products.require(product)?, *amount)?
            }
            DiscountDef::CategoryAmount {
                category,
                minimum_quantity,
                amount,
            } => Discount::category_amount(
                name,
                categories.require(category)?,
                *minimum_quantity,
                *amount,
            )?,
            DiscountDef::CategoryRate {
                category,
                minimum_quantity,
                rate,
            } => Discount::category_rate(
                name,
                categories.require(category)?,
                *minimum_quantity,
                *rate,
            )?,
            DiscountDef::CartAmount { threshold, amount } => {
                Discount::cart_amount(name, *threshold, *amount)?
            }
            DiscountDef::CartRate { threshold, rate } => {
                Discount::cart_rate(name, *threshold, *rate)?
            }
            DiscountDef::Fixed { amount } => Discount::fixed(name, *amount)?,
        };
        Ok(discount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CampaignDef {
    pub name: String,
    #[serde(default)]
    pub discount_name: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finish: Option<DateTime<Utc>>,
    pub discount: DiscountDef,
}

impl CampaignDef {
    /// A missing start means "since forever"; a missing finish means "always".
    pub fn window(&self) -> ValidityWindow {
        ValidityWindow::new(
            self.start.unwrap_or(DateTime::<Utc>::MIN_UTC),
            self.finish,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CouponDef {
    pub code: String,
    #[serde(default)]
    pub discount_name: Option<String>,
    pub discount: DiscountDef,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineDef {
    pub product: String,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartDef {
    #[serde(default)]
    pub lines: Vec<LineDef>,
    /// Codes of the coupons redeemed with this cart.
    #[serde(default)]
    pub coupons: Vec<String>,
}

/// A whole scenario file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub categories: Vec<CategoryDef>,
    #[serde(default)]
    pub products: Vec<ProductDef>,
    #[serde(default)]
    pub campaigns: Vec<CampaignDef>,
    #[serde(default)]
    pub coupons: Vec<CouponDef>,
    #[serde(default)]
    pub cart: CartDef,
}

impl Scenario {
    pub fn load(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading scenario");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Scenario(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::Scenario(e.to_string()))
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// The resolved catalogs of a scenario.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub categories: Catalog<Arc<Category>>,
    pub products: Catalog<Product>,
    pub campaigns: Catalog<DiscountItem>,
    pub coupons: Catalog<DiscountItem>,
    pub cart: CartDef,
}

impl Storefront {
    /// Assembles the provider tree: all campaigns, then the redeemed coupons.
    ///
    /// ## Errors
    /// `Store(NotFound)` when a redeemed code is not in the coupon catalog.
    pub fn root_provider(&self, coupon_codes: &[String]) -> AppResult<DiscountGroup> {
        let mut campaigns = DiscountGroup::new();
        for campaign in self.campaigns.values() {
            campaigns.add_discount_provider(campaign.clone());
        }

        let mut coupons = DiscountGroup::new();
        for code in coupon_codes {
            coupons.add_discount_provider(self.coupons.require(code)?);
        }

        debug!(
            campaigns = campaigns.len(),
            coupons = coupons.len(),
            "Provider tree assembled"
        );

        let mut root = DiscountGroup::new();
        root.add_discount_provider(campaigns);
        root.add_discount_provider(coupons);
        Ok(root)
    }
}

impl TryFrom<Scenario> for Storefront {
    type Error = AppError;

    fn try_from(scenario: Scenario) -> Result<Self, Self::Error> {
        let mut categories: Catalog<Arc<Category>> = Catalog::new("Category");
        for def in &scenario.categories {
            let parent = match &def.parent {
                Some(title) => Some(categories.require(title)?),
                None => None,
            };
            let category = Category::new(&def.title, parent)?;
            categories.insert(category.title().to_string(), Arc::new(category))?;
        }

        let mut products = Catalog::new("Product");
        for def in &scenario.products {
            let product = Product::new(&def.title, def.price, categories.require(&def.category)?)?;
            products.insert(product.title().to_string(), product)?;
        }

        let mut campaigns = Catalog::new("Campaign");
        for def in &scenario.campaigns {
            let name = def.discount_name.as_deref().unwrap_or(&def.name);
            let discount = def.discount.build(name, &categories, &products)?;
            let item = DiscountItem::new(discount).with_window(def.window());
            campaigns.insert(def.name.clone(), item)?;
        }

        let mut coupons = Catalog::new("Coupon");
        for def in &scenario.coupons {
            let name = def.discount_name.as_deref().unwrap_or(&def.code);
            let discount = def.discount.build(name, &categories, &products)?;
            coupons.insert(def.code.clone(), DiscountItem::new(discount))?;
        }

        info!(
            categories = categories.len(),
            products = products.len(),
            campaigns = campaigns.len(),
            coupons = coupons.len(),
            "Storefront resolved"
        );

        Ok(Storefront {
            categories,
            products,
            campaigns,
            coupons,
            cart: scenario.cart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_store::StoreError;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"
        [[categories]]
        title = "Food"

        [[categories]]
        title = "Fruit"
        parent = "Food"

        [[products]]
        title = "Apple"
        price = 1000
        category = "Fruit"

        [[campaigns]]
        name = "fruit-week"
        start = "2024-01-01T00:00:00Z"
        finish = "2024-02-01T00:00:00Z"
        discount = { kind = "category_rate", category = "Fruit", minimum_quantity = 3, rate = 1000 }

        [[campaigns]]
        name = "big-basket"
        discount_name = "min-cart"
        discount = { kind = "cart_amount", threshold = 5000, amount = 500 }

        [[coupons]]
        code = "SAVE5"
        discount = { kind = "fixed", amount = 500 }

        [cart]
        lines = [{ product = "Apple", quantity = 6 }]
        coupons = ["SAVE5"]
    "#;

    #[test]
    fn test_parse_sample() {
        let scenario = Scenario::from_toml_str(SAMPLE).unwrap();

        assert_eq!(scenario.categories.len(), 2);
        assert_eq!(scenario.products[0].price, Money::from_cents(1000));
        assert_eq!(
            scenario.campaigns[0].discount,
            DiscountDef::CategoryRate {
                category: "Fruit".to_string(),
                minimum_quantity: Quantity::new(3).unwrap(),
                rate: Rate::from_bps(1000).unwrap(),
            }
        );
        assert_eq!(scenario.cart.lines[0].quantity, Quantity::new(6).unwrap());
    }

    #[test]
    fn test_campaign_window() {
        let scenario = Scenario::from_toml_str(SAMPLE).unwrap();
        let window = scenario.campaigns[0].window();

        assert!(window.contains(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert!(scenario.campaigns[1].window().finish().is_none());
    }

    #[test]
    fn test_storefront_resolves_references() {
        let storefront = Storefront::try_from(Scenario::from_toml_str(SAMPLE).unwrap()).unwrap();

        let fruit = storefront.categories.require("Fruit").unwrap();
        assert_eq!(fruit.parent().map(Category::title), Some("Food"));

        let big_basket = storefront.campaigns.require("big-basket").unwrap();
        assert_eq!(big_basket.discount().name().as_str(), "min-cart");
        let save5 = storefront.coupons.require("SAVE5").unwrap();
        assert_eq!(save5.discount().name().as_str(), "SAVE5");
    }

    #[test]
    fn test_unknown_category_is_not_found() {
        let mut scenario = Scenario::from_toml_str(SAMPLE).unwrap();
        scenario.products[0].category = "Toys".to_string();

        let err = Storefront::try_from(scenario).unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_bad_amount_is_invalid_value() {
        let mut scenario = Scenario::from_toml_str(SAMPLE).unwrap();
        scenario.coupons[0].discount = DiscountDef::Fixed { amount: Money::zero() };

        let err = Storefront::try_from(scenario).unwrap_err();
        assert!(matches!(err, AppError::Core(_)));
    }

    #[test]
    fn test_negative_quantity_rejected_while_parsing() {
        let err = Scenario::from_toml_str(
            r#"
            [cart]
            lines = [{ product = "Apple", quantity = -1 }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Scenario(_)));
    }

    #[test]
    fn test_root_provider_orders_campaigns_before_coupons() {
        let storefront = Storefront::try_from(Scenario::from_toml_str(SAMPLE).unwrap()).unwrap();
        let root = storefront.root_provider(&["SAVE5".to_string()]).unwrap();

        assert_eq!(root.len(), 2);
        match &root.children()[1] {
            basket_core::DiscountProvider::Group(coupons) => assert_eq!(coupons.len(), 1),
            other => panic!("expected coupon group, got {:?}", other),
        }

        let err = storefront.root_provider(&["NOPE".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Coupon not found: NOPE");
    }
}
