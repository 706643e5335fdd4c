//! Common types used throughout pos-extract
//!
//! This module contains shared type definitions, type aliases,
//! and the catalog of collections the extractor knows how to read.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Separator used when several related values are packed into one column
pub const LIST_DELIMITER: &str = "|";

/// Sort key sent with every collection request
pub const SORT_KEY: &str = "createdAt";

/// Side-loads requested for the sales collection
pub const SALES_INCLUDE: &str = "items,items.product,items.product.productCategory,\
payments.paymentMethod,discounts,tips,waiter,customer,items.subitems,items.subitems.product";

// ============================================================================
// Collections
// ============================================================================

/// A collection exposed by the point-of-sale API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// Sales with their items, payments, discounts and tips
    Sales,
    /// Product catalog
    Products,
    /// Product categories
    Categories,
    /// Staff accounts
    Users,
    /// Payment methods
    PaymentMethods,
    /// Registered customers
    Customers,
    /// Expenses with their payments
    Expenses,
}

impl Collection {
    /// Every known collection, in catalog order
    pub const ALL: [Collection; 7] = [
        Collection::Sales,
        Collection::Products,
        Collection::Categories,
        Collection::Users,
        Collection::PaymentMethods,
        Collection::Customers,
        Collection::Expenses,
    ];

    /// Name used on the command line and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Products => "products",
            Collection::Categories => "categories",
            Collection::Users => "users",
            Collection::PaymentMethods => "payment-methods",
            Collection::Customers => "customers",
            Collection::Expenses => "expenses",
        }
    }

    /// Path segment under the API base URL
    pub fn api_path(&self) -> &'static str {
        match self {
            Collection::Categories => "product-categories",
            other => other.name(),
        }
    }

    /// Relationships side-loaded with each page
    pub fn default_include(&self) -> &'static str {
        match self {
            Collection::Sales => SALES_INCLUDE,
            Collection::Products => "productCategory",
            Collection::Users => "role",
            Collection::Expenses => "expenseCategory,payments.paymentMethod",
            Collection::Categories | Collection::PaymentMethods | Collection::Customers => "",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == needle || c.api_path() == needle)
            .ok_or(Error::UnknownCollection { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_from_str() {
        assert_eq!("sales".parse::<Collection>().unwrap(), Collection::Sales);
        assert_eq!(
            "payment_methods".parse::<Collection>().unwrap(),
            Collection::PaymentMethods
        );
        assert_eq!(
            "product-categories".parse::<Collection>().unwrap(),
            Collection::Categories
        );
        assert!(matches!(
            "orders".parse::<Collection>(),
            Err(Error::UnknownCollection { .. })
        ));
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::Categories.api_path(), "product-categories");
        assert_eq!(Collection::PaymentMethods.api_path(), "payment-methods");
        assert!(Collection::Sales.default_include().contains("items.subitems.product"));
        assert!(Collection::Customers.default_include().is_empty());
    }
}
