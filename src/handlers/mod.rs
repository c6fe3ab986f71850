//! HTTP request handlers.
//!
//! Each invoice handler checks that its required input is present, runs
//! exactly one statement through [`Database`](crate::db::Database) and maps
//! the rows to JSON. Failures are returned as [`ApiError`](crate::error::ApiError).

mod extract;
pub mod health;
pub mod inquiries;
pub mod invoices;

pub use extract::{JsonBody, QueryParams};
pub use health::health_check;
pub use inquiries::handle_inquiry;
pub use invoices::{
    count_invoices, create_invoice, delete_invoices, get_highest_balance_invoice,
    get_top_invoices, get_total_amount, search_invoices, update_invoice_balance,
};

/// Treat absent and empty parameters alike.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
