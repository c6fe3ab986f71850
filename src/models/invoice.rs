use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub project: String,
    pub contractor_name: String,
    pub vendor_name: String,
    pub invoice_amount: f64,
    pub balance: f64,
}

/// Column values for a row that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub project: String,
    pub contractor_name: String,
    pub vendor_name: String,
    pub invoice_amount: f64,
    pub balance: f64,
}

/// The (project, contractor, vendor) triple deletes are matched on.
/// Not unique, so it may address several rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceKey {
    pub project: String,
    pub contractor_name: String,
    pub vendor_name: String,
}
