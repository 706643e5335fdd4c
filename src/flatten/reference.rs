//! Reference collection flattening
//!
//! Products, categories, users, payment methods, customers and expenses all
//! flatten to exactly one row per resource. Their schemas differ only in which
//! attributes they copy and which relationships they resolve, so a single
//! flattener is driven by a list of [`ColumnSpec`]s.

use super::{Flattener, PaymentLists, Row};
use crate::document::{IncludedIndex, Resource};
use crate::types::Collection;
use serde_json::json;

/// How one (or, for payments, two) output columns are produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// The resource id
    Id {
        /// Output column
        column: &'static str,
    },
    /// Raw attribute value, empty string when absent
    Attribute {
        /// Output column
        column: &'static str,
        /// Source attribute
        attribute: &'static str,
    },
    /// Attribute of a to-one related resource, empty string when unresolved
    Related {
        /// Output column
        column: &'static str,
        /// Relationship name on the resource
        relationship: &'static str,
        /// Attribute read from the related resource
        attribute: &'static str,
    },
    /// Payments and their methods as two parallel delimiter-joined columns
    Payments {
        /// Relationship holding the payment references
        relationship: &'static str,
        /// Output column for method names
        methods_column: &'static str,
        /// Output column for amounts
        amounts_column: &'static str,
    },
}

impl ColumnSpec {
    /// Id column
    pub const fn id(column: &'static str) -> Self {
        Self::Id { column }
    }

    /// Raw attribute column
    pub const fn attr(column: &'static str, attribute: &'static str) -> Self {
        Self::Attribute { column, attribute }
    }

    /// One-level relationship column
    pub const fn related(
        column: &'static str,
        relationship: &'static str,
        attribute: &'static str,
    ) -> Self {
        Self::Related {
            column,
            relationship,
            attribute,
        }
    }

    /// Two-level payments columns
    pub const fn payments(
        relationship: &'static str,
        methods_column: &'static str,
        amounts_column: &'static str,
    ) -> Self {
        Self::Payments {
            relationship,
            methods_column,
            amounts_column,
        }
    }

    /// Output columns produced by this spec
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            Self::Id { column } | Self::Attribute { column, .. } | Self::Related { column, .. } => {
                vec![*column]
            }
            Self::Payments {
                methods_column,
                amounts_column,
                ..
            } => vec![*methods_column, *amounts_column],
        }
    }

    fn write(&self, resource: &Resource, index: &IncludedIndex<'_>, row: &mut Row) {
        match self {
            Self::Id { column } => row.push(*column, resource.id.as_str()),
            Self::Attribute { column, attribute } => {
                row.push(*column, resource.attr_or(attribute, json!("")));
            }
            Self::Related {
                column,
                relationship,
                attribute,
            } => row.push(*column, index.related_attr(resource, relationship, attribute)),
            Self::Payments {
                relationship,
                methods_column,
                amounts_column,
            } => {
                let lists = PaymentLists::resolve(index, resource.relationship(relationship).refs());
                row.push(*methods_column, lists.methods_joined());
                row.push(*amounts_column, lists.amounts_joined());
            }
        }
    }
}

/// Flattens a reference resource into a single row
#[derive(Debug, Clone)]
pub struct ReferenceFlattener {
    specs: Vec<ColumnSpec>,
}

impl ReferenceFlattener {
    /// Create a flattener from column specs
    pub fn new(specs: Vec<ColumnSpec>) -> Self {
        Self { specs }
    }

    /// Built-in schema for a reference collection
    ///
    /// `Collection::Sales` has no reference schema; it maps to an id-only row.
    pub fn for_collection(collection: Collection) -> Self {
        let specs = match collection {
            Collection::Products => products(),
            Collection::Categories => vec![
                ColumnSpec::id("category_id"),
                ColumnSpec::attr("name", "name"),
                ColumnSpec::attr("active", "active"),
            ],
            Collection::Users => vec![
                ColumnSpec::id("user_id"),
                ColumnSpec::attr("name", "name"),
                ColumnSpec::attr("email", "email"),
                ColumnSpec::attr("active", "active"),
                ColumnSpec::attr("admin", "admin"),
                ColumnSpec::related("role", "role", "name"),
                ColumnSpec::attr("promotional_code", "promotionalCode"),
            ],
            Collection::PaymentMethods => vec![
                ColumnSpec::id("payment_method_id"),
                ColumnSpec::attr("name", "name"),
                ColumnSpec::attr("code", "code"),
                ColumnSpec::attr("active", "active"),
            ],
            Collection::Customers => vec![
                ColumnSpec::id("customer_id"),
                ColumnSpec::attr("name", "name"),
                ColumnSpec::attr("email", "email"),
                ColumnSpec::attr("phone", "phone"),
                ColumnSpec::attr("address", "address"),
                ColumnSpec::attr("sales_count", "salesCount"),
                ColumnSpec::attr("historical_sales_count", "historicalSalesCount"),
            ],
            Collection::Expenses => expenses(),
            Collection::Sales => vec![ColumnSpec::id("sale_id")],
        };
        Self::new(specs)
    }

    /// Column specs driving this flattener
    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    /// Flatten one resource into exactly one row
    pub fn flatten_one(&self, resource: &Resource, index: &IncludedIndex<'_>) -> Row {
        let mut row = Row::with_capacity(self.specs.len() + 1);
        for spec in &self.specs {
            spec.write(resource, index, &mut row);
        }
        row
    }
}

impl Flattener for ReferenceFlattener {
    fn columns(&self) -> Vec<&'static str> {
        self.specs.iter().flat_map(ColumnSpec::columns).collect()
    }

    fn flatten(&self, resource: &Resource, index: &IncludedIndex<'_>) -> Vec<Row> {
        vec![self.flatten_one(resource, index)]
    }
}

fn products() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::id("product_id"),
        ColumnSpec::attr("name", "name"),
        ColumnSpec::attr("price", "price"),
        ColumnSpec::attr("cost", "cost"),
        ColumnSpec::attr("active", "active"),
        ColumnSpec::related("category", "productCategory", "name"),
        ColumnSpec::attr("stock", "stock"),
        ColumnSpec::attr("stock_control", "stockControl"),
        ColumnSpec::attr("sell_alone", "sellAlone"),
        ColumnSpec::attr("favourite", "favourite"),
        ColumnSpec::attr("code", "code"),
        ColumnSpec::attr("description", "description"),
        ColumnSpec::attr("preparation_time", "preparationTime"),
        ColumnSpec::attr("image_url", "imageUrl"),
        ColumnSpec::attr("enable_online_menu", "enableOnlineMenu"),
        ColumnSpec::attr("enable_qr_menu", "enableQrMenu"),
    ]
}

fn expenses() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::id("expense_id"),
        ColumnSpec::attr("amount", "amount"),
        ColumnSpec::attr("description", "description"),
        ColumnSpec::attr("date", "date"),
        ColumnSpec::attr("created_at", "createdAt"),
        ColumnSpec::attr("status", "status"),
        ColumnSpec::attr("receipt_number", "receiptNumber"),
        ColumnSpec::attr("payment_date", "paymentDate"),
        ColumnSpec::attr("due_date", "dueDate"),
        ColumnSpec::related("category", "expenseCategory", "name"),
        ColumnSpec::payments("payments", "payment_methods", "payment_amounts"),
    ]
}
