//! The closed set of spending categories a transaction can belong to.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};

/// What a transaction was spent on.
///
/// Stored and submitted as the upper-case name, e.g. `FOOD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Fuel, fares and vehicle costs.
    Transport,
    /// Rent, mortgage and home maintenance.
    Housing,
    /// Power, water, internet and phone bills.
    Utilities,
    /// Medical, dental and pharmacy costs.
    Health,
    /// Events, hobbies and subscriptions.
    Entertainment,
    /// Clothes, electronics and other goods.
    Shopping,
    /// Courses, books and tuition.
    Education,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Utilities,
        Category::Health,
        Category::Entertainment,
        Category::Shopping,
        Category::Education,
        Category::Other,
    ];

    /// The stored name of the category, e.g. "FOOD".
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Transport => "TRANSPORT",
            Category::Housing => "HOUSING",
            Category::Utilities => "UTILITIES",
            Category::Health => "HEALTH",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Shopping => "SHOPPING",
            Category::Education => "EDUCATION",
            Category::Other => "OTHER",
        }
    }

    /// The human readable name of the category, e.g. "Food".
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

/// The string did not name one of the known categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category \"{0}\"")]
pub struct UnknownCategoryName(pub String);

impl FromStr for Category {
    type Err = UnknownCategoryName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategoryName(s.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::category::{Category, UnknownCategoryName};

    #[test]
    fn parses_stored_names() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn rejects_unknown_and_lower_case_names() {
        assert_eq!(
            Category::from_str("GROCERIES"),
            Err(UnknownCategoryName("GROCERIES".to_owned()))
        );
        assert_eq!(
            Category::from_str("food"),
            Err(UnknownCategoryName("food".to_owned()))
        );
    }

    #[test]
    fn serde_uses_stored_names() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"ENTERTAINMENT\"");

        let category: Category = serde_json::from_str("\"UTILITIES\"").unwrap();
        assert_eq!(category, Category::Utilities);
    }
}
