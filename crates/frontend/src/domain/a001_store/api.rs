use contracts::domain::a001_store::aggregate::StoreUpsert;
use contracts::domain::a005_visit::aggregate::Visit;
use contracts::domain::a006_note::aggregate::{CreateNote, Note};
use contracts::domain::a007_brand_pros_cons::aggregate::{BrandProsCons, CreateBrandProsCons};
use contracts::projections::p900_intent_audit::dto::IntentAudit;
use contracts::projections::p901_monthly_sale::dto::MonthlySaleChange;
use gloo_net::http::Method;
use std::future::Future;

use crate::shared::api_utils::{ApiClient, ApiError, QueryParams};

pub const EXPORT_FILENAME: &str = "customers_export.csv";

fn by_id(id: i64) -> QueryParams {
    QueryParams::new().with("id", id)
}

/// Create a new store
pub async fn create_store(client: &ApiClient, dto: &StoreUpsert) -> Result<(), ApiError> {
    client
        .send_body(Method::POST, "/store/create", &QueryParams::new(), dto)
        .await
}

/// Update an existing store
pub async fn update_store(client: &ApiClient, id: i64, dto: &StoreUpsert) -> Result<(), ApiError> {
    client.send_body(Method::PUT, "/store/edit", &by_id(id), dto).await
}

/// Run `primary`; if it fails, log and run `fallback` once.
pub async fn with_fallback<T, P, F, Fut>(primary: P, fallback: F) -> Result<T, ApiError>
where
    P: Future<Output = Result<T, ApiError>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match primary.await {
        Ok(value) => Ok(value),
        Err(e) => {
            log::warn!("Primary call failed ({}), trying fallback", e);
            fallback().await
        }
    }
}

/// Delete a store. The backend exposes two delete routes; the path-style one
/// is tried when the query-style one fails.
pub async fn delete_store(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    with_fallback(
        client.send_empty(Method::DELETE, "/store/deleteById", &by_id(id)),
        || async move {
            client
                .send_empty(Method::DELETE, &format!("/store/delete/{}", id), &QueryParams::new())
                .await
        },
    )
    .await
}

/// Server-side CSV export of all stores
pub async fn export_stores(client: &ApiClient) -> Result<Vec<u8>, ApiError> {
    client.get_bytes("/store/export", &QueryParams::new()).await
}

pub async fn fetch_visits(client: &ApiClient, store_id: i64) -> Result<Vec<Visit>, ApiError> {
    client.get_json("/visit/getByStore", &by_id(store_id)).await
}

pub async fn fetch_notes(client: &ApiClient, store_id: i64) -> Result<Vec<Note>, ApiError> {
    client.get_json("/notes/getByStore", &by_id(store_id)).await
}

pub async fn create_note(client: &ApiClient, dto: &CreateNote) -> Result<(), ApiError> {
    client
        .send_body(Method::POST, "/notes/create", &QueryParams::new(), dto)
        .await
}

pub async fn delete_note(client: &ApiClient, note_id: i64) -> Result<(), ApiError> {
    client.send_empty(Method::DELETE, "/notes/delete", &by_id(note_id)).await
}

pub async fn fetch_brands(client: &ApiClient, store_id: i64) -> Result<Vec<BrandProsCons>, ApiError> {
    client.get_json("/brand/getByStore", &by_id(store_id)).await
}

pub async fn create_brand(client: &ApiClient, dto: &CreateBrandProsCons) -> Result<(), ApiError> {
    client
        .send_body(Method::POST, "/brand/create", &QueryParams::new(), dto)
        .await
}

pub async fn delete_brand(client: &ApiClient, brand_id: i64) -> Result<(), ApiError> {
    client.send_empty(Method::DELETE, "/brand/delete", &by_id(brand_id)).await
}

pub async fn fetch_intent_history(client: &ApiClient, store_id: i64) -> Result<Vec<IntentAudit>, ApiError> {
    client.get_json("/intent-audit/getByStore", &by_id(store_id)).await
}

pub async fn fetch_monthly_sale_history(
    client: &ApiClient,
    store_id: i64,
) -> Result<Vec<MonthlySaleChange>, ApiError> {
    client.get_json("/monthly-sale/getByStore", &by_id(store_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_fallback_runs_once_after_failure() {
        let calls = Cell::new(0);
        let result = with_fallback(
            async { Err::<(), _>(ApiError::Status { status: 405 }) },
            || async {
                calls.set(calls.get() + 1);
                Ok(())
            },
        )
        .await;
        assert_eq!(result, Ok(()));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_fallback_skipped_on_success() {
        let calls = Cell::new(0);
        let result = with_fallback(async { Ok(7) }, || async {
            calls.set(calls.get() + 1);
            Ok(0)
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_both_failing_reports_fallback_error() {
        let result = with_fallback(
            async { Err::<(), _>(ApiError::Status { status: 405 }) },
            || async { Err(ApiError::Status { status: 500 }) },
        )
        .await;
        assert_eq!(result, Err(ApiError::Status { status: 500 }));
    }
}
