//! Flattening module
//!
//! Turns resources plus their resolved relations into flat, wide rows.
//!
//! # Overview
//!
//! - [`SaleFlattener`] - one row per sale item, sale-level fields repeated
//! - [`ReferenceFlattener`] - one row per resource, driven by [`ColumnSpec`]s
//!
//! Both implement [`Flattener`], which the extraction engine uses per page.
//! Flattening never fails: unresolved references produce empty strings or
//! zeroes and the row keeps its full column schema.

mod reference;
mod row;
mod sale;

pub use reference::{ColumnSpec, ReferenceFlattener};
pub use row::Row;
pub use sale::{SaleFlattener, SALE_COLUMNS};

use crate::document::{IncludedIndex, Reference, Resource};
use crate::types::{Collection, JsonValue, LIST_DELIMITER};

/// Converts one primary resource into rows
pub trait Flattener: Send + Sync {
    /// Column names of every row produced, in order
    fn columns(&self) -> Vec<&'static str>;

    /// Flatten a resource using the page's index
    fn flatten(&self, resource: &Resource, index: &IncludedIndex<'_>) -> Vec<Row>;
}

/// Flattener for a collection
pub fn flattener_for(collection: Collection) -> Box<dyn Flattener> {
    match collection {
        Collection::Sales => Box::new(SaleFlattener::new()),
        other => Box::new(ReferenceFlattener::for_collection(other)),
    }
}

/// Parallel method-name and amount lists built from payment references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentLists {
    /// Payment method display names
    pub methods: Vec<String>,
    /// Payment amounts, stringified
    pub amounts: Vec<String>,
}

impl PaymentLists {
    /// Resolve each payment and its `paymentMethod`
    ///
    /// Unresolved payments are skipped in both lists; a resolved payment with
    /// an unresolved method contributes an empty name, so positions always
    /// line up.
    pub fn resolve(index: &IncludedIndex<'_>, payments: &[Reference]) -> Self {
        let mut lists = Self::default();
        for payment in index.resolve_many(payments) {
            lists
                .methods
                .push(index.related_attr(payment, "paymentMethod", "name"));
            lists.amounts.push(amount_text(payment.attr("amount")));
        }
        lists
    }

    /// Method names joined with the list delimiter
    pub fn methods_joined(&self) -> String {
        self.methods.join(LIST_DELIMITER)
    }

    /// Amounts joined with the list delimiter
    pub fn amounts_joined(&self) -> String {
        self.amounts.join(LIST_DELIMITER)
    }
}

fn amount_text(value: Option<&JsonValue>) -> String {
    match value {
        None => "0".to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
