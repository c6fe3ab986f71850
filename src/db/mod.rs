use std::str::FromStr;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::config::Config;
use crate::models::{Invoice, InvoiceKey, NewInvoice};

/// Number of rows returned by the top-invoices query.
pub const TOP_INVOICES_LIMIT: i64 = 5;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id INTEGER PRIMARY KEY,
        project TEXT NOT NULL,
        contractor_name TEXT NOT NULL,
        vendor_name TEXT NOT NULL,
        invoice_amount REAL NOT NULL,
        balance REAL NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_invoices_project ON invoices (project)",
];

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance with a connection pool.
    ///
    /// The database file is created if it does not exist yet.
    pub async fn new(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(config.database_url())?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the invoices table and its index if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(self.get_pool()).await?;
        }

        Ok(())
    }

    /// Round-trip a trivial statement to check the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.get_pool()).await?;
        Ok(())
    }

    // Read operations
    pub async fn top_invoices_for_project(&self, project: &str) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, project, contractor_name, vendor_name, invoice_amount, balance
            FROM invoices
            WHERE project = ?
            ORDER BY invoice_amount DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(project)
        .bind(TOP_INVOICES_LIMIT)
        .fetch_all(self.get_pool())
        .await?;

        Ok(invoices)
    }

    pub async fn highest_balance_invoice(&self) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, project, contractor_name, vendor_name, invoice_amount, balance
            FROM invoices
            ORDER BY balance DESC, id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.get_pool())
        .await?;

        Ok(invoice)
    }

    /// Rows whose contractor or vendor name contains `needle` literally.
    pub async fn search_invoices(&self, needle: &str) -> Result<Vec<Invoice>> {
        let pattern = like_pattern(needle);

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, project, contractor_name, vendor_name, invoice_amount, balance
            FROM invoices
            WHERE contractor_name LIKE ? ESCAPE '\' OR vendor_name LIKE ? ESCAPE '\'
            ORDER BY id ASC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.get_pool())
        .await?;

        Ok(invoices)
    }

    /// Sum of `invoice_amount` for a project, `None` when it has no rows.
    pub async fn total_amount_for_project(&self, project: &str) -> Result<Option<f64>> {
        let total = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT SUM(invoice_amount) FROM invoices WHERE project = ?",
        )
        .bind(project)
        .fetch_one(self.get_pool())
        .await?;

        Ok(total)
    }

    pub async fn count_for_contractor(&self, contractor_name: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM invoices WHERE contractor_name = ?",
        )
        .bind(contractor_name)
        .fetch_one(self.get_pool())
        .await?;

        Ok(count)
    }

    // Write operations
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO invoices (project, contractor_name, vendor_name, invoice_amount, balance)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.project)
        .bind(&invoice.contractor_name)
        .bind(&invoice.vendor_name)
        .bind(invoice.invoice_amount)
        .bind(invoice.balance)
        .execute(self.get_pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replace the balance of one row. Returns the number of rows touched,
    /// which is zero for an unknown id.
    pub async fn update_balance(&self, id: i64, balance: f64) -> Result<u64> {
        let result = sqlx::query("UPDATE invoices SET balance = ? WHERE id = ?")
            .bind(balance)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every row matching the triple. Returns how many were removed.
    pub async fn delete_invoices(&self, key: &InvoiceKey) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM invoices
            WHERE project = ? AND contractor_name = ? AND vendor_name = ?
            "#,
        )
        .bind(&key.project)
        .bind(&key.contractor_name)
        .bind(&key.vendor_name)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a batch of rows in one transaction.
    pub async fn insert_invoices(&self, invoices: &[NewInvoice]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let mut inserted = 0;
        for invoice in invoices {
            let result = sqlx::query(
                r#"
                INSERT INTO invoices (project, contractor_name, vendor_name, invoice_amount, balance)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&invoice.project)
            .bind(&invoice.contractor_name)
            .bind(&invoice.vendor_name)
            .bind(invoice.invoice_amount)
            .bind(invoice.balance)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;

        Ok(inserted)
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Open the connection pool and make sure the schema exists
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;
    db.ensure_schema().await?;
    debug!(database_url = config.database_url(), "Schema ready");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn test_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("invoices.db").display()),
            ..Config::default()
        };
        let db = init(&config).await.unwrap();
        (dir, db)
    }

    fn invoice(project: &str, contractor: &str, vendor: &str, amount: f64, balance: f64) -> NewInvoice {
        NewInvoice {
            project: project.to_string(),
            contractor_name: contractor.to_string(),
            vendor_name: vendor.to_string(),
            invoice_amount: amount,
            balance,
        }
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let (_dir, db) = test_db().await;
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn top_invoices_break_ties_by_insertion_order() {
        let (_dir, db) = test_db().await;
        let first = db.create_invoice(&invoice("P", "A", "VA", 100.0, 1.0)).await.unwrap();
        let second = db.create_invoice(&invoice("P", "B", "VB", 100.0, 1.0)).await.unwrap();
        db.create_invoice(&invoice("P", "C", "VC", 300.0, 1.0)).await.unwrap();

        let top = db.top_invoices_for_project("P").await.unwrap();
        let ids: Vec<i64> = top.iter().map(|i| i.id).collect();
        assert_eq!(top[0].invoice_amount, 300.0);
        assert_eq!(&ids[1..], &[first, second]);
    }

    #[tokio::test]
    async fn top_invoices_are_capped() {
        let (_dir, db) = test_db().await;
        for n in 0..8_i32 {
            db.create_invoice(&invoice("P", "A", "V", f64::from(n), 0.0)).await.unwrap();
        }

        let top = db.top_invoices_for_project("P").await.unwrap();
        assert_eq!(top.len() as i64, TOP_INVOICES_LIMIT);
        assert_eq!(top[0].invoice_amount, 7.0);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let (_dir, db) = test_db().await;
        db.create_invoice(&invoice("P", "100% Builders", "V", 1.0, 1.0)).await.unwrap();
        db.create_invoice(&invoice("P", "1000 Builders", "V", 1.0, 1.0)).await.unwrap();

        let hits = db.search_invoices("0% B").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].contractor_name, "100% Builders");
    }

    #[tokio::test]
    async fn search_ignores_ascii_case() {
        let (_dir, db) = test_db().await;
        db.create_invoice(&invoice("P", "Acme", "Globex Supply", 1.0, 1.0)).await.unwrap();

        assert_eq!(db.search_invoices("GLOBEX").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn total_is_none_without_rows() {
        let (_dir, db) = test_db().await;
        assert_eq!(db.total_amount_for_project("nope").await.unwrap(), None);

        db.create_invoice(&invoice("P", "A", "V", 10.5, 0.0)).await.unwrap();
        db.create_invoice(&invoice("P", "B", "V", 4.5, 0.0)).await.unwrap();
        assert_eq!(db.total_amount_for_project("P").await.unwrap(), Some(15.0));
    }

    #[tokio::test]
    async fn update_and_delete_report_affected_rows() {
        let (_dir, db) = test_db().await;
        let id = db.create_invoice(&invoice("P", "A", "V", 10.0, 10.0)).await.unwrap();
        db.create_invoice(&invoice("P", "A", "V", 20.0, 20.0)).await.unwrap();

        assert_eq!(db.update_balance(id, 0.0).await.unwrap(), 1);
        assert_eq!(db.update_balance(id + 100, 0.0).await.unwrap(), 0);

        let key = InvoiceKey {
            project: "P".to_string(),
            contractor_name: "A".to_string(),
            vendor_name: "V".to_string(),
        };
        assert_eq!(db.delete_invoices(&key).await.unwrap(), 2);
        assert_eq!(db.delete_invoices(&key).await.unwrap(), 0);
        assert_eq!(db.count_for_contractor("A").await.unwrap(), 0);
    }
}
