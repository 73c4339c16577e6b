//! The closed set of categories a transaction can be filed under.
//!
//! Income is always filed under [Category::Income]. Expenses must use one of
//! the twenty [EXPENSE_CATEGORIES], which is the single list shared by input
//! validation, the category summary and the CSV import fallback.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// A transaction category.
///
/// Variants are declared in the same order as [EXPENSE_CATEGORIES] so that
/// ordered collections keyed by category list them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Paperwork, fees and other admin costs.
    Administrative,
    /// Books, courses and tuition.
    #[serde(rename = "Books & Education")]
    BooksAndEducation,
    /// Clothes, shoes and accessories.
    #[serde(rename = "Clothing & Accessories")]
    ClothingAndAccessories,
    /// Restaurants, cafes and takeaways.
    #[serde(rename = "Eat out")]
    EatOut,
    /// Devices and gadgets.
    Electronics,
    /// Unplanned, urgent spending.
    Emergency,
    /// Movies, games, events.
    Entertainment,
    /// Presents for others.
    #[serde(rename = "Gifts & Souvenirs")]
    GiftsAndSouvenirs,
    /// Food and household supplies.
    Groceries,
    /// Doctors, pharmacy and insurance.
    #[serde(rename = "Health & Medical")]
    HealthAndMedical,
    /// Rent or mortgage.
    Housing,
    /// Internet and mobile plans.
    #[serde(rename = "Internet & Phone")]
    InternetAndPhone,
    /// Laundry and cleaning services or products.
    #[serde(rename = "Laundry & Cleaning")]
    LaundryAndCleaning,
    /// Haircuts, toiletries and similar.
    #[serde(rename = "Personal Care")]
    PersonalCare,
    /// General purchases.
    Shopping,
    /// Attractions and guided tours.
    #[serde(rename = "Sightseeing & Tours")]
    SightseeingAndTours,
    /// Gym memberships and sports gear.
    #[serde(rename = "Sports & Fitness")]
    SportsAndFitness,
    /// Public transport, fuel and parking.
    Transportation,
    /// Flights, accommodation and holidays.
    #[serde(rename = "Travel & Vacation")]
    TravelAndVacation,
    /// Power, water and gas.
    Utilities,
    /// Money earned. The only category valid for income.
    Income,
}

/// The twenty expense categories, in display order.
pub const EXPENSE_CATEGORIES: [Category; 20] = [
    Category::Administrative,
    Category::BooksAndEducation,
    Category::ClothingAndAccessories,
    Category::EatOut,
    Category::Electronics,
    Category::Emergency,
    Category::Entertainment,
    Category::GiftsAndSouvenirs,
    Category::Groceries,
    Category::HealthAndMedical,
    Category::Housing,
    Category::InternetAndPhone,
    Category::LaundryAndCleaning,
    Category::PersonalCare,
    Category::Shopping,
    Category::SightseeingAndTours,
    Category::SportsAndFitness,
    Category::Transportation,
    Category::TravelAndVacation,
    Category::Utilities,
];

/// The category imported expenses are filed under when their category is not recognised.
pub const FALLBACK_EXPENSE_CATEGORY: Category = Category::Shopping;

impl Category {
    /// The display name of the category, which is also how it is stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Administrative => "Administrative",
            Category::BooksAndEducation => "Books & Education",
            Category::ClothingAndAccessories => "Clothing & Accessories",
            Category::EatOut => "Eat out",
            Category::Electronics => "Electronics",
            Category::Emergency => "Emergency",
            Category::Entertainment => "Entertainment",
            Category::GiftsAndSouvenirs => "Gifts & Souvenirs",
            Category::Groceries => "Groceries",
            Category::HealthAndMedical => "Health & Medical",
            Category::Housing => "Housing",
            Category::InternetAndPhone => "Internet & Phone",
            Category::LaundryAndCleaning => "Laundry & Cleaning",
            Category::PersonalCare => "Personal Care",
            Category::Shopping => "Shopping",
            Category::SightseeingAndTours => "Sightseeing & Tours",
            Category::SportsAndFitness => "Sports & Fitness",
            Category::Transportation => "Transportation",
            Category::TravelAndVacation => "Travel & Vacation",
            Category::Utilities => "Utilities",
            Category::Income => "Income",
        }
    }

    /// Whether this is one of the [EXPENSE_CATEGORIES].
    pub fn is_expense(&self) -> bool {
        *self != Category::Income
    }

    /// Parse an expense category name, or use [FALLBACK_EXPENSE_CATEGORY] if
    /// `name` is not one of the [EXPENSE_CATEGORIES].
    pub fn expense_or_fallback(name: &str) -> Self {
        match name.trim().parse::<Category>() {
            Ok(category) if category.is_expense() => category,
            _ => FALLBACK_EXPENSE_CATEGORY,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when a string is not a known category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a known category")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parse a category from its exact display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Category::Income.as_str() {
            return Ok(Category::Income);
        }

        EXPENSE_CATEGORIES
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// The names of the expense categories, in display order.
pub fn expense_category_names() -> Vec<&'static str> {
    EXPENSE_CATEGORIES.iter().map(Category::as_str).collect()
}
