//! Sale flattening
//!
//! A sale fans out into one row per item. Every row carries the same
//! sale-level columns (customer, waiter, totals, payments) followed by the
//! item columns. A sale without item references still yields one row, with
//! the item columns present but empty.

use super::{Flattener, PaymentLists, Row};
use crate::document::{value_text, IncludedIndex, Resource};
use crate::types::{JsonValue, LIST_DELIMITER};
use serde_json::json;

/// Column schema of sale line-item rows
pub const SALE_COLUMNS: [&str; 24] = [
    "sale_id",
    "created_at",
    "closed_at",
    "sale_total",
    "sale_type",
    "sale_state",
    "people",
    "comment",
    "customer_name",
    "customer_phone",
    "customer_email",
    "waiter",
    "discount_total",
    "tips_total",
    "payment_methods",
    "payment_amounts",
    "product_name",
    "product_category",
    "item_quantity",
    "item_price",
    "item_cost",
    "item_comment",
    "item_canceled",
    "subitems",
];

/// Flattens sales into line-item rows
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleFlattener;

impl SaleFlattener {
    /// Create a sale flattener
    pub fn new() -> Self {
        Self
    }
}

impl Flattener for SaleFlattener {
    fn columns(&self) -> Vec<&'static str> {
        SALE_COLUMNS.to_vec()
    }

    fn flatten(&self, sale: &Resource, index: &IncludedIndex<'_>) -> Vec<Row> {
        let header = SaleFields::resolve(sale, index);
        let item_refs = sale.relationship("items").refs();

        if item_refs.is_empty() {
            return vec![header.row(&ItemFields::default())];
        }

        index
            .resolve_many(item_refs)
            .into_iter()
            .map(|item| header.row(&ItemFields::resolve(item, index)))
            .collect()
    }
}

/// Sale-level values shared by every row of one sale
#[derive(Debug)]
struct SaleFields {
    sale_id: String,
    created_at: JsonValue,
    closed_at: JsonValue,
    total: JsonValue,
    sale_type: JsonValue,
    sale_state: JsonValue,
    people: JsonValue,
    comment: JsonValue,
    customer: CustomerFields,
    waiter: String,
    discount_total: f64,
    tips_total: f64,
    payments: PaymentLists,
}

impl SaleFields {
    fn resolve(sale: &Resource, index: &IncludedIndex<'_>) -> Self {
        Self {
            sale_id: sale.id.clone(),
            created_at: sale.attr_or("createdAt", json!("")),
            closed_at: sale.attr_or("closedAt", json!("")),
            total: sale.attr_or("total", json!(0)),
            sale_type: sale.attr_or("saleType", json!("")),
            sale_state: sale.attr_or("saleState", json!("")),
            people: sale.attr_or("people", json!("")),
            comment: sale.attr_or("comment", json!("")),
            customer: CustomerFields::resolve(sale, index),
            waiter: index.related_attr(sale, "waiter", "name"),
            discount_total: sum_amounts(sale, index, "discounts"),
            tips_total: sum_amounts(sale, index, "tips"),
            payments: PaymentLists::resolve(index, sale.relationship("payments").refs()),
        }
    }

    fn row(&self, item: &ItemFields) -> Row {
        let mut row = Row::with_capacity(SALE_COLUMNS.len());
        row.push("sale_id", self.sale_id.as_str());
        row.push("created_at", self.created_at.clone());
        row.push("closed_at", self.closed_at.clone());
        row.push("sale_total", self.total.clone());
        row.push("sale_type", self.sale_type.clone());
        row.push("sale_state", self.sale_state.clone());
        row.push("people", self.people.clone());
        row.push("comment", self.comment.clone());
        row.push("customer_name", self.customer.name.as_str());
        row.push("customer_phone", self.customer.phone.as_str());
        row.push("customer_email", self.customer.email.as_str());
        row.push("waiter", self.waiter.as_str());
        row.push("discount_total", self.discount_total);
        row.push("tips_total", self.tips_total);
        row.push("payment_methods", self.payments.methods_joined());
        row.push("payment_amounts", self.payments.amounts_joined());
        row.push("product_name", item.product_name.as_str());
        row.push("product_category", item.category.as_str());
        row.push("item_quantity", item.quantity.clone());
        row.push("item_price", item.price.clone());
        row.push("item_cost", item.cost.clone());
        row.push("item_comment", item.comment.clone());
        row.push("item_canceled", item.canceled.clone());
        row.push("subitems", item.subitems.as_str());
        row
    }
}

#[derive(Debug, Default)]
struct CustomerFields {
    name: String,
    phone: String,
    email: String,
}

impl CustomerFields {
    /// Name precedence: inline `customerName`, then the resolved customer,
    /// then the inline anonymous customer. The anonymous phone only applies
    /// when the anonymous name is used, and only if it is non-empty.
    fn resolve(sale: &Resource, index: &IncludedIndex<'_>) -> Self {
        let registered = index.related(sale, "customer");

        let mut name = sale.attr_str("customerName");
        if name.is_empty() {
            name = registered.map(|c| c.attr_str("name")).unwrap_or_default();
        }
        let mut phone = registered.map(|c| c.attr_str("phone")).unwrap_or_default();
        let email = registered.map(|c| c.attr_str("email")).unwrap_or_default();

        let anonymous = sale
            .attr("anonymousCustomer")
            .and_then(JsonValue::as_object)
            .filter(|a| !a.is_empty());
        if let Some(anonymous) = anonymous {
            if name.is_empty() {
                name = value_text(anonymous.get("name"));
                let anonymous_phone = value_text(anonymous.get("phone"));
                if !anonymous_phone.is_empty() {
                    phone = anonymous_phone;
                }
            }
        }

        Self { name, phone, email }
    }
}

/// Item-level values; all empty for a sale without items
#[derive(Debug)]
struct ItemFields {
    product_name: String,
    category: String,
    quantity: JsonValue,
    price: JsonValue,
    cost: JsonValue,
    comment: JsonValue,
    canceled: JsonValue,
    subitems: String,
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            category: String::new(),
            quantity: json!(""),
            price: json!(""),
            cost: json!(""),
            comment: json!(""),
            canceled: json!(""),
            subitems: String::new(),
        }
    }
}

impl ItemFields {
    fn resolve(item: &Resource, index: &IncludedIndex<'_>) -> Self {
        let product = index.related(item, "product");

        let subitems: Vec<String> = item
            .relationship("subitems")
            .refs()
            .iter()
            .filter_map(|subitem_ref| {
                let subitem = index.resolve(subitem_ref)?;
                let name = match index.related(subitem, "product") {
                    Some(product) => product.attr_str("name"),
                    None => format!("subitem#{}", subitem_ref.id),
                };
                Some(name)
            })
            .collect();

        Self {
            product_name: product.map(|p| p.attr_str("name")).unwrap_or_default(),
            category: product
                .map(|p| index.related_attr(p, "productCategory", "name"))
                .unwrap_or_default(),
            quantity: item.attr_or("quantity", json!("")),
            price: item.attr_or("price", json!("")),
            cost: product.map_or_else(|| json!(""), |p| p.attr_or("cost", json!(""))),
            comment: item.attr_or("comment", json!("")),
            canceled: item.attr_or("canceled", json!("")),
            subitems: subitems.join(LIST_DELIMITER),
        }
    }
}

fn sum_amounts(sale: &Resource, index: &IncludedIndex<'_>, relationship: &str) -> f64 {
    index
        .related_many(sale, relationship)
        .into_iter()
        .map(|r| r.attr_amount("amount"))
        .sum()
}
