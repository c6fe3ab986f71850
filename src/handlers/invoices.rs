//! Invoice query and mutation endpoints.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::{JsonBody, QueryParams, non_empty};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateInvoiceRequest, DeleteInvoiceRequest, Invoice, UpdateBalanceRequest,
};
use crate::server::AppState;

/// Minimum number of characters a search query must have.
pub const MIN_SEARCH_LEN: usize = 3;

const NO_PROJECT_INVOICES: &str = "No invoices found for the specified project.";

#[derive(Debug, Deserialize)]
pub struct ProjectParams {
    project: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContractorParams {
    contractor_name: Option<String>,
}

fn require_project(params: ProjectParams) -> ApiResult<String> {
    non_empty(params.project).ok_or_else(|| ApiError::bad_request("Project parameter is required!"))
}

/// GET /invoices/top?project=P
#[instrument(name = "get_top_invoices", skip(state, params))]
pub async fn get_top_invoices(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ProjectParams>,
) -> ApiResult<Json<Vec<Invoice>>> {
    let project = require_project(params)?;

    let invoices = state.db().top_invoices_for_project(&project).await?;
    if invoices.is_empty() {
        return Err(ApiError::not_found(NO_PROJECT_INVOICES));
    }

    debug!(%project, rows = invoices.len(), "Loaded top invoices");
    Ok(Json(invoices))
}

/// GET /invoices/highest_balance
#[instrument(name = "get_highest_balance_invoice", skip(state))]
pub async fn get_highest_balance_invoice(State(state): State<AppState>) -> ApiResult<Json<Invoice>> {
    state
        .db()
        .highest_balance_invoice()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No invoices found."))
}

/// GET /invoices/search?query=Q
#[instrument(name = "search_invoices", skip(state, params))]
pub async fn search_invoices(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> ApiResult<Json<Vec<Invoice>>> {
    let query = params
        .query
        .filter(|q| q.chars().count() >= MIN_SEARCH_LEN)
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "Query parameter is required and must be at least {MIN_SEARCH_LEN} characters long!"
            ))
        })?;

    let invoices = state.db().search_invoices(&query).await?;
    if invoices.is_empty() {
        return Err(ApiError::not_found("No results found for the given query."));
    }

    debug!(%query, rows = invoices.len(), "Search matched invoices");
    Ok(Json(invoices))
}

/// POST /invoices
#[instrument(name = "create_invoice", skip(state, body))]
pub async fn create_invoice(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let invoice = body
        .into_new_invoice()
        .ok_or_else(|| ApiError::bad_request("Missing required fields!"))?;

    let id = state.db().create_invoice(&invoice).await?;
    info!(id, project = %invoice.project, "Invoice created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Invoice created successfully!", "id": id })),
    ))
}

/// PUT /invoices/update_balance/{id}
///
/// Succeeds even when no row has the given id.
#[instrument(name = "update_invoice_balance", skip(state, id, body))]
pub async fn update_invoice_balance(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    JsonBody(body): JsonBody<UpdateBalanceRequest>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id.map_err(|_| ApiError::bad_request("Invoice id must be an integer!"))?;
    let balance = body
        .balance
        .ok_or_else(|| ApiError::bad_request("Balance field is required!"))?;

    let updated = state.db().update_balance(id, balance).await?;
    info!(id, balance, updated, "Invoice balance updated");

    Ok(Json(json!({ "message": "Invoice balance updated successfully" })))
}

/// DELETE /invoices
///
/// Removes every row matching the (project, contractor, vendor) triple,
/// and succeeds when nothing matched.
#[instrument(name = "delete_invoices", skip(state, body))]
pub async fn delete_invoices(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DeleteInvoiceRequest>,
) -> ApiResult<Json<Value>> {
    let key = body.into_key().ok_or_else(|| {
        ApiError::bad_request("Project, contractor_name, and vendor_name fields are required!")
    })?;

    let deleted = state.db().delete_invoices(&key).await?;
    info!(
        project = %key.project,
        contractor_name = %key.contractor_name,
        vendor_name = %key.vendor_name,
        deleted,
        "Invoices deleted"
    );

    Ok(Json(json!({ "message": "Invoice deleted successfully" })))
}

/// GET /invoices/total_amount?project=P
#[instrument(name = "get_total_amount", skip(state, params))]
pub async fn get_total_amount(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ProjectParams>,
) -> ApiResult<Json<Value>> {
    let project = require_project(params)?;

    let total = state
        .db()
        .total_amount_for_project(&project)
        .await?
        .ok_or_else(|| ApiError::not_found(NO_PROJECT_INVOICES))?;

    Ok(Json(json!({ "total_amount": total })))
}

/// GET /invoices/count?contractor_name=C
#[instrument(name = "count_invoices", skip(state, params))]
pub async fn count_invoices(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ContractorParams>,
) -> ApiResult<Json<Value>> {
    let contractor_name = non_empty(params.contractor_name)
        .ok_or_else(|| ApiError::bad_request("Contractor name parameter is required!"))?;

    let count = state.db().count_for_contractor(&contractor_name).await?;

    Ok(Json(json!({ "invoice_count": count })))
}
