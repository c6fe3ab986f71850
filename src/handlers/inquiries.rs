use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{QueryParams, non_empty};
use crate::error::{ApiError, ApiResult};

/// Questions outside the service's subject that get a polite refusal.
pub const OFF_TOPIC_QUESTIONS: &[&str] = &[
    "What's the current score of the match?",
    "What is the weather today?",
];

pub const DECLINE_MESSAGE: &str =
    "I'm sorry, but I can't help with that question. Please ask about invoices or related topics.";

#[derive(Debug, Deserialize)]
pub struct InquiryParams {
    question: Option<String>,
}

#[instrument(name = "handle_inquiry", skip(params))]
pub async fn handle_inquiry(QueryParams(params): QueryParams<InquiryParams>) -> ApiResult<Json<Value>> {
    let question = non_empty(params.question)
        .ok_or_else(|| ApiError::bad_request("Question parameter is required!"))?;

    if OFF_TOPIC_QUESTIONS.contains(&question.as_str()) {
        debug!(%question, "Declining off-topic question");
        return Ok(Json(json!({ "message": DECLINE_MESSAGE })));
    }

    Err(ApiError::not_found("No answer is available for the given question."))
}
