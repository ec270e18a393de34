//! Baseline market price estimation from a free-text item name.
//!
//! An item is categorised by keyword matching against a fixed, ordered
//! category table, then a price is sampled uniformly from the range of the
//! first matching item keyword in that category (or the category default).
//!
//! Sampling is random, so the same item can yield different prices across
//! calls. The [`estimate_with`] entry point takes any [`rand::Rng`] so that
//! callers needing reproducible output can pass a seeded generator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive price range in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `amount` lies within `[min, max]`.
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Product category inferred from an item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bakery,
    Electronics,
    Clothing,
    Groceries,
    Dairy,
    Produce,
    Meat,
    Beverages,
    Pantry,
    Shoes,
    Accessories,
    /// Fallback when no keyword matches.
    General,
}

/// Categories in match order with their trigger keywords. First match wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Bakery,
        &["bread", "bagel", "muffin", "croissant", "donut", "cake", "cookie"],
    ),
    (
        Category::Electronics,
        &[
            "laptop",
            "computer",
            "phone",
            "tablet",
            "tv",
            "television",
            "headphones",
            "speaker",
            "camera",
        ],
    ),
    (
        Category::Clothing,
        &["shirt", "pants", "jeans", "dress", "jacket", "coat", "sweater"],
    ),
    (
        Category::Groceries,
        &["milk", "bread", "eggs", "chicken", "rice", "bananas", "tomatoes"],
    ),
    (Category::Dairy, &["milk", "cheese", "yogurt", "butter"]),
    (
        Category::Produce,
        &["apple", "banana", "orange", "lettuce", "tomato", "carrot"],
    ),
    (Category::Meat, &["chicken", "beef", "pork", "fish", "salmon"]),
    (Category::Beverages, &["juice", "soda", "water", "coffee"]),
    (Category::Pantry, &["rice", "pasta", "flour", "sugar", "oil"]),
    (
        Category::Shoes,
        &["shoes", "sneakers", "boots", "sandals", "heels"],
    ),
    (
        Category::Accessories,
        &["bag", "purse", "wallet", "watch", "jewelry"],
    ),
];

const BAKERY_PRICES: &[(&str, PriceRange)] = &[
    ("bread", PriceRange::new(2.50, 6.00)),
    ("bagel", PriceRange::new(1.00, 3.00)),
    ("muffin", PriceRange::new(1.50, 4.00)),
    ("croissant", PriceRange::new(1.50, 3.50)),
    ("donut", PriceRange::new(0.50, 2.00)),
    ("cake", PriceRange::new(10.00, 50.00)),
    ("cookie", PriceRange::new(0.25, 1.50)),
];

const ELECTRONICS_PRICES: &[(&str, PriceRange)] = &[
    ("laptop", PriceRange::new(400.0, 2000.0)),
    ("computer", PriceRange::new(500.0, 2500.0)),
    ("phone", PriceRange::new(200.0, 1500.0)),
    ("tablet", PriceRange::new(150.0, 1000.0)),
    ("tv", PriceRange::new(200.0, 3000.0)),
    ("television", PriceRange::new(200.0, 3000.0)),
    ("headphones", PriceRange::new(30.0, 500.0)),
    ("speaker", PriceRange::new(50.0, 500.0)),
    ("camera", PriceRange::new(200.0, 2000.0)),
];

const CLOTHING_PRICES: &[(&str, PriceRange)] = &[
    ("shirt", PriceRange::new(15.0, 80.0)),
    ("pants", PriceRange::new(25.0, 150.0)),
    ("jeans", PriceRange::new(30.0, 200.0)),
    ("dress", PriceRange::new(25.0, 200.0)),
    ("jacket", PriceRange::new(50.0, 300.0)),
    ("coat", PriceRange::new(80.0, 400.0)),
    ("sweater", PriceRange::new(30.0, 150.0)),
    ("shoes", PriceRange::new(40.0, 300.0)),
    ("sneakers", PriceRange::new(50.0, 250.0)),
    ("boots", PriceRange::new(60.0, 350.0)),
];

const GROCERIES_PRICES: &[(&str, PriceRange)] = &[
    ("milk", PriceRange::new(3.50, 6.00)),
    ("bread", PriceRange::new(2.50, 5.50)),
    ("eggs", PriceRange::new(2.50, 5.00)),
    ("chicken", PriceRange::new(5.00, 15.00)),
    ("rice", PriceRange::new(3.00, 10.00)),
    ("bananas", PriceRange::new(0.50, 2.00)),
    ("tomatoes", PriceRange::new(2.00, 6.00)),
];

const DAIRY_PRICES: &[(&str, PriceRange)] = &[
    ("milk", PriceRange::new(3.50, 6.00)),
    ("cheese", PriceRange::new(3.00, 12.00)),
    ("yogurt", PriceRange::new(1.00, 8.00)),
    ("butter", PriceRange::new(3.00, 6.00)),
];

const PRODUCE_PRICES: &[(&str, PriceRange)] = &[
    ("apple", PriceRange::new(0.75, 2.50)),
    ("banana", PriceRange::new(0.50, 2.00)),
    ("orange", PriceRange::new(0.75, 2.50)),
    ("lettuce", PriceRange::new(1.50, 4.00)),
    ("tomato", PriceRange::new(1.00, 5.00)),
    ("carrot", PriceRange::new(1.00, 3.00)),
];

const MEAT_PRICES: &[(&str, PriceRange)] = &[
    ("chicken", PriceRange::new(5.00, 15.00)),
    ("beef", PriceRange::new(6.00, 20.00)),
    ("pork", PriceRange::new(4.00, 12.00)),
    ("fish", PriceRange::new(8.00, 25.00)),
    ("salmon", PriceRange::new(10.00, 30.00)),
];

const BEVERAGES_PRICES: &[(&str, PriceRange)] = &[
    ("juice", PriceRange::new(2.50, 8.00)),
    ("soda", PriceRange::new(1.50, 6.00)),
    ("water", PriceRange::new(1.00, 5.00)),
    ("coffee", PriceRange::new(5.00, 20.00)),
];

const PANTRY_PRICES: &[(&str, PriceRange)] = &[
    ("rice", PriceRange::new(3.00, 10.00)),
    ("pasta", PriceRange::new(1.50, 5.00)),
    ("flour", PriceRange::new(2.50, 8.00)),
    ("sugar", PriceRange::new(2.00, 6.00)),
    ("oil", PriceRange::new(3.00, 12.00)),
];

const SHOES_PRICES: &[(&str, PriceRange)] = &[
    ("shoes", PriceRange::new(40.0, 300.0)),
    ("sneakers", PriceRange::new(50.0, 250.0)),
    ("boots", PriceRange::new(60.0, 350.0)),
    ("sandals", PriceRange::new(20.0, 150.0)),
    ("heels", PriceRange::new(40.0, 200.0)),
];

const ACCESSORIES_PRICES: &[(&str, PriceRange)] = &[
    ("bag", PriceRange::new(20.0, 300.0)),
    ("purse", PriceRange::new(30.0, 400.0)),
    ("wallet", PriceRange::new(15.0, 150.0)),
    ("watch", PriceRange::new(50.0, 500.0)),
    ("jewelry", PriceRange::new(20.0, 500.0)),
];

impl Category {
    /// Returns the lowercase name of this category.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bakery => "bakery",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Groceries => "groceries",
            Self::Dairy => "dairy",
            Self::Produce => "produce",
            Self::Meat => "meat",
            Self::Beverages => "beverages",
            Self::Pantry => "pantry",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
            Self::General => "general",
        }
    }

    /// Item keyword price ranges for this category, in match order.
    fn item_prices(&self) -> &'static [(&'static str, PriceRange)] {
        match self {
            Self::Bakery => BAKERY_PRICES,
            Self::Electronics => ELECTRONICS_PRICES,
            Self::Clothing => CLOTHING_PRICES,
            Self::Groceries => GROCERIES_PRICES,
            Self::Dairy => DAIRY_PRICES,
            Self::Produce => PRODUCE_PRICES,
            Self::Meat => MEAT_PRICES,
            Self::Beverages => BEVERAGES_PRICES,
            Self::Pantry => PANTRY_PRICES,
            Self::Shoes => SHOES_PRICES,
            Self::Accessories => ACCESSORIES_PRICES,
            Self::General => &[],
        }
    }

    /// Range used when no item keyword in this category matches.
    pub fn default_range(&self) -> PriceRange {
        match self {
            Self::Bakery => PriceRange::new(3.00, 8.00),
            Self::Electronics => PriceRange::new(100.0, 800.0),
            Self::Clothing => PriceRange::new(20.0, 100.0),
            Self::Groceries => PriceRange::new(3.00, 10.00),
            Self::Dairy => PriceRange::new(3.00, 8.00),
            Self::Produce => PriceRange::new(1.50, 5.00),
            Self::Meat => PriceRange::new(6.00, 18.00),
            Self::Beverages => PriceRange::new(2.00, 8.00),
            Self::Pantry => PriceRange::new(2.50, 8.00),
            Self::Shoes => PriceRange::new(50.0, 200.0),
            Self::Accessories => PriceRange::new(25.0, 200.0),
            Self::General => PriceRange::new(5.00, 50.00),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An estimated baseline price and the category it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePrice {
    pub category: Category,
    pub amount: f64,
}

/// Categorise an item name. Matching is a case-insensitive substring test.
pub fn categorize(item_name: &str) -> Category {
    let name = item_name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map_or(Category::General, |(category, _)| *category)
}

/// Select the price range for an item within its category.
pub fn price_range(category: Category, item_name: &str) -> PriceRange {
    let name = item_name.to_lowercase();
    category
        .item_prices()
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map_or_else(|| category.default_range(), |(_, range)| *range)
}

/// Estimate a baseline price using the supplied random source.
pub fn estimate_with<R: Rng + ?Sized>(item_name: &str, rng: &mut R) -> BasePrice {
    let category = categorize(item_name);
    let range = price_range(category, item_name);
    let amount = range.min + rng.gen::<f64>() * (range.max - range.min);
    BasePrice {
        category,
        amount: round_to_cents(amount),
    }
}

/// Estimate a baseline price and category using the thread RNG.
pub fn estimate_base_price(item_name: &str) -> BasePrice {
    estimate_with(item_name, &mut rand::thread_rng())
}

/// Estimate a baseline price for an item name using the thread RNG.
///
/// Always returns a positive amount.
pub fn estimate(item_name: &str) -> f64 {
    estimate_base_price(item_name).amount
}

/// Round to 2 decimal places.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
