//! Request payloads as they arrive over the wire.
//!
//! Every field is optional so a missing field surfaces as a 400 with the
//! route's own message instead of a generic deserialization failure.

use serde::Deserialize;

use super::{InvoiceKey, NewInvoice};

#[derive(Deserialize, Debug, Default)]
pub struct CreateInvoiceRequest {
    pub project: Option<String>,
    pub contractor_name: Option<String>,
    pub vendor_name: Option<String>,
    pub invoice_amount: Option<f64>,
    pub balance: Option<f64>,
}

impl CreateInvoiceRequest {
    /// Returns the row to insert, or `None` if any field is absent.
    pub fn into_new_invoice(self) -> Option<NewInvoice> {
        Some(NewInvoice {
            project: self.project?,
            contractor_name: self.contractor_name?,
            vendor_name: self.vendor_name?,
            invoice_amount: self.invoice_amount?,
            balance: self.balance?,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct DeleteInvoiceRequest {
    pub project: Option<String>,
    pub contractor_name: Option<String>,
    pub vendor_name: Option<String>,
}

impl DeleteInvoiceRequest {
    pub fn into_key(self) -> Option<InvoiceKey> {
        Some(InvoiceKey {
            project: self.project?,
            contractor_name: self.contractor_name?,
            vendor_name: self.vendor_name?,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateBalanceRequest {
    pub balance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_every_field() {
        let complete: CreateInvoiceRequest = serde_json::from_str(
            r#"{"project":"P","contractor_name":"C","vendor_name":"V","invoice_amount":10,"balance":5.5}"#,
        )
        .unwrap();
        let invoice = complete.into_new_invoice().unwrap();
        assert_eq!(invoice.invoice_amount, 10.0);
        assert_eq!(invoice.balance, 5.5);

        let partial: CreateInvoiceRequest =
            serde_json::from_str(r#"{"project":"P","contractor_name":"C","vendor_name":"V"}"#).unwrap();
        assert!(partial.into_new_invoice().is_none());
    }

    #[test]
    fn delete_request_ignores_extra_fields() {
        let request: DeleteInvoiceRequest = serde_json::from_str(
            r#"{"project":"P","contractor_name":"C","vendor_name":"V","balance":1}"#,
        )
        .unwrap();
        let key = request.into_key().unwrap();
        assert_eq!(key.project, "P");
        assert_eq!(key.vendor_name, "V");
    }
}
