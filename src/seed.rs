//! Fixture rows for local development and the `seed` binary.

use anyhow::Result;
use tracing::info;

use crate::db::Database;
use crate::models::NewInvoice;

/// (project, contractor, vendor, invoice amount, balance)
const SAMPLE_INVOICES: &[(&str, &str, &str, f64, f64)] = &[
    ("Project X", "Contractor A", "Vendor A", 20000.0, 15000.0),
    ("Project X", "Contractor B", "Vendor B", 18000.0, 5000.0),
    ("Project Y", "Contractor C", "Vendor C", 22000.0, 22000.0),
    ("Project X", "Contractor D", "Vendor D", 25000.0, 10000.0),
    ("Project Z", "Contractor E", "Vendor E", 30000.0, 30000.0),
    ("Project X", "Contractor F", "Vendor F", 16000.0, 12000.0),
    ("Project Y", "Contractor G", "Vendor G", 29000.0, 5000.0),
    ("Project Z", "Contractor H", "Vendor H", 35000.0, 20000.0),
    ("Project X", "Contractor I", "Vendor I", 21000.0, 6000.0),
    ("Project Y", "Contractor J", "Vendor J", 24000.0, 24000.0),
];

pub fn sample_invoices() -> Vec<NewInvoice> {
    SAMPLE_INVOICES
        .iter()
        .map(|&(project, contractor, vendor, amount, balance)| NewInvoice {
            project: project.to_string(),
            contractor_name: contractor.to_string(),
            vendor_name: vendor.to_string(),
            invoice_amount: amount,
            balance,
        })
        .collect()
}

/// Ensure the schema and insert the fixture rows.
///
/// Not idempotent: every run appends another copy of the fixture.
pub async fn seed(db: &Database) -> Result<u64> {
    db.ensure_schema().await?;
    let inserted = db.insert_invoices(&sample_invoices()).await?;
    info!(inserted, "Sample data inserted");

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn reseeding_duplicates_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("seed.db").display()),
            ..Config::default()
        };
        // No schema yet: seeding has to create it.
        let db = Database::new(&config).await.unwrap();

        assert_eq!(seed(&db).await.unwrap(), 10);
        assert_eq!(seed(&db).await.unwrap(), 10);
        assert_eq!(db.count_for_contractor("Contractor A").await.unwrap(), 2);
    }
}
