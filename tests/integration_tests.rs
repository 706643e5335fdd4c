//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: token exchange → paginated JSON:API
//! requests → included index → flattened rows

use pos_extract::auth::{AuthSession, Credentials};
use pos_extract::engine::{ExtractConfig, Extractor};
use pos_extract::http::{HttpClient, HttpClientConfig};
use pos_extract::pagination::{PageFetcher, RetryPolicy};
use pos_extract::{Collection, Error, Row};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn sales_page_one() -> Value {
    json!({
        "data": [
            {
                "type": "Sale", "id": "1",
                "attributes": {"createdAt": "2024-05-01T10:00:00Z", "total": 7, "saleType": "EAT-IN", "saleState": "CLOSED", "people": 2},
                "relationships": {
                    "items": {"data": [{"type": "Item", "id": "11"}]},
                    "waiter": {"data": {"type": "User", "id": "5"}},
                    "customer": {"data": {"type": "Customer", "id": "8"}},
                    "payments": {"data": [{"type": "Payment", "id": "31"}]},
                    "discounts": {"data": []},
                    "tips": {"data": [{"type": "Tip", "id": "41"}]}
                }
            },
            {
                "type": "Sale", "id": "2",
                "attributes": {"createdAt": "2024-05-01T10:05:00Z", "total": 3.5, "customerName": "Bob"},
                "relationships": {
                    "items": {"data": [{"type": "Item", "id": "12"}]},
                    "customer": {"data": null}
                }
            }
        ],
        "included": [
            {"type": "User", "id": "5", "attributes": {"name": "Mara"}},
            {"type": "Customer", "id": "8", "attributes": {"name": "Ana", "phone": "555-0101", "email": "ana@example.com"}},
            {"type": "ProductCategory", "id": "3", "attributes": {"name": "Coffee"}},
            {"type": "Product", "id": "21", "attributes": {"name": "Latte", "cost": 1.2},
             "relationships": {"productCategory": {"data": {"type": "ProductCategory", "id": "3"}}}},
            {"type": "Product", "id": "22", "attributes": {"name": "Scone"}},
            {"type": "Item", "id": "11", "attributes": {"quantity": 2, "price": 3.5},
             "relationships": {"product": {"data": {"type": "Product", "id": "21"}}}},
            {"type": "Item", "id": "12", "attributes": {"quantity": 1, "price": 3.5},
             "relationships": {"product": {"data": {"type": "Product", "id": "22"}}}},
            {"type": "PaymentMethod", "id": "1", "attributes": {"name": "Cash"}},
            {"type": "Payment", "id": "31", "attributes": {"amount": 7},
             "relationships": {"paymentMethod": {"data": {"type": "PaymentMethod", "id": "1"}}}},
            {"type": "Tip", "id": "41", "attributes": {"amount": "1.5"}}
        ]
    })
}

fn sales_page_two() -> Value {
    json!({
        "data": [
            {
                "type": "Sale", "id": "3",
                "attributes": {
                    "createdAt": "2024-05-01T10:10:00Z",
                    "total": 0,
                    "anonymousCustomer": {"name": "Walk-in", "phone": ""}
                },
                "relationships": {"items": {"data": []}}
            }
        ],
        "included": []
    })
}

async fn mount_auth(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn extractor(server: &MockServer) -> pos_extract::Result<Extractor> {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}/v1alpha1", server.uri()))
        .build();
    let client = HttpClient::with_config(config)?;
    let session = AuthSession::connect(
        format!("{}/auth", server.uri()),
        Credentials::new("key", "secret"),
        client.inner().clone(),
    )
    .await?;
    let fetcher = PageFetcher::new(client, Arc::new(session), RetryPolicy::immediate());
    Ok(Extractor::new(fetcher).with_config(ExtractConfig::new().with_page_size(2)))
}

fn column(rows: &[Row], name: &str) -> Vec<String> {
    rows.iter()
        .map(|row| match row.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        })
        .collect()
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[tokio::test]
async fn test_sales_end_to_end() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/v1alpha1/sales"))
        .and(query_param("page[number]", "1"))
        .and(query_param("page[size]", "2"))
        .and(query_param("sort", "createdAt"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sales_page_one()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1alpha1/sales"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sales_page_two()))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor(&server).await.unwrap();
    let (rows, stats) = extractor.extract(Collection::Sales).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(column(&rows, "sale_id"), vec!["1", "2", "3"]);
    assert_eq!(column(&rows, "product_name"), vec!["Latte", "Scone", ""]);
    assert_eq!(column(&rows, "product_category"), vec!["Coffee", "", ""]);
    assert_eq!(column(&rows, "customer_name"), vec!["Ana", "Bob", "Walk-in"]);
    assert_eq!(column(&rows, "customer_phone"), vec!["555-0101", "", ""]);
    assert_eq!(column(&rows, "waiter"), vec!["Mara", "", ""]);
    assert_eq!(column(&rows, "payment_methods"), vec!["Cash", "", ""]);
    assert_eq!(column(&rows, "payment_amounts"), vec!["7", "", ""]);
    assert_eq!(column(&rows, "tips_total"), vec!["1.5", "0.0", "0.0"]);

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.records_fetched, 3);
    assert_eq!(stats.unique_records(), 3);
    assert_eq!(
        stats.last_created_at.as_deref(),
        Some("2024-05-01T10:10:00Z")
    );
}

#[tokio::test]
async fn test_sales_reauthenticate_mid_run() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(query_param("page[number]", "1"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sales_page_one()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page[number]", "2"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page[number]", "2"))
        .and(header("Authorization", "Bearer tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sales_page_two()))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor(&server).await.unwrap();
    // The first token is spent by connect; the refresh gets the second one
    mount_auth(&server, "tok-2").await;

    let (rows, _) = extractor.extract(Collection::Sales).await.unwrap();

    assert_eq!(column(&rows, "sale_id"), vec!["1", "2", "3"]);
    assert_eq!(
        extractor.fetcher().session().token().await.value,
        "tok-2"
    );
}

#[tokio::test]
async fn test_auth_failure_keeps_partial_rows() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(query_param("page[number]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sales_page_one()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor(&server).await.unwrap();
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(403).set_body_string("revoked"))
        .mount(&server)
        .await;

    let mut rows = Vec::new();
    let result = extractor.extract_into(Collection::Sales, &mut rows).await;

    assert!(matches!(result, Err(Error::Auth { .. })));
    assert_eq!(column(&rows, "sale_id"), vec!["1", "2"]);
}

#[tokio::test]
async fn test_connect_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = extractor(&server).await;
    assert!(matches!(result, Err(Error::Auth { .. })));
}

#[tokio::test]
async fn test_expenses_end_to_end() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/v1alpha1/expenses"))
        .and(query_param("include", "expenseCategory,payments.paymentMethod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "type": "Expense", "id": 70,
                "attributes": {"amount": 150.5, "description": "Milk", "status": "PAID"},
                "relationships": {
                    "expenseCategory": {"data": {"type": "ExpenseCategory", "id": "2"}},
                    "payments": {"data": [{"type": "Payment", "id": "90"}]}
                }
            }],
            "included": [
                {"type": "ExpenseCategory", "id": "2", "attributes": {"name": "Supplies"}},
                {"type": "PaymentMethod", "id": "4", "attributes": {"name": "Transfer"}},
                {"type": "Payment", "id": "90", "attributes": {"amount": 150.5},
                 "relationships": {"paymentMethod": {"data": {"type": "PaymentMethod", "id": "4"}}}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = extractor(&server).await.unwrap();
    let (rows, _) = extractor.extract(Collection::Expenses).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_str("expense_id"), Some("70"));
    assert_eq!(rows[0].get_str("category"), Some("Supplies"));
    assert_eq!(rows[0].get_str("payment_methods"), Some("Transfer"));
    assert_eq!(rows[0].get_str("payment_amounts"), Some("150.5"));
    assert_eq!(rows[0].get_str("date"), Some(""));
}
