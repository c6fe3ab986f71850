mod invoice;
mod request;

pub use invoice::{Invoice, InvoiceKey, NewInvoice};
pub use request::{CreateInvoiceRequest, DeleteInvoiceRequest, UpdateBalanceRequest};
