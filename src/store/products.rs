//! Product records and read-only queries

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite::StoreError;

/// A row of the `products` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "product_name")]
    #[sqlx(rename = "product_name")]
    pub name: String,
    pub barcode: String,
    pub expiry_date: String,
    pub status: String,
}

// The table is owned elsewhere and its column affinities are not ours to
// pick, so every text field is read through a CAST.
macro_rules! select_products {
    () => {
        "SELECT products.id AS id, \
         CAST(products.product_name AS TEXT) AS product_name, \
         CAST(products.barcode AS TEXT) AS barcode, \
         CAST(products.expiry_date AS TEXT) AS expiry_date, \
         CAST(products.status AS TEXT) AS status \
         FROM products"
    };
}

/// Column a product listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Barcode,
    ExpiryDate,
    Status,
}

impl SortKey {
    /// All keys, in selector order
    pub const ALL: [SortKey; 5] = [
        SortKey::Id,
        SortKey::Name,
        SortKey::Barcode,
        SortKey::ExpiryDate,
        SortKey::Status,
    ];

    /// Label shown in the sort selector
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Id => "Product ID",
            SortKey::Name => "Product Name",
            SortKey::Barcode => "Barcode",
            SortKey::ExpiryDate => "Expiry Date",
            SortKey::Status => "Status",
        }
    }

    /// Database column backing this key
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "product_name",
            SortKey::Barcode => "barcode",
            SortKey::ExpiryDate => "expiry_date",
            SortKey::Status => "status",
        }
    }

    /// Resolve a selector label or column name. Anything else orders by id.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.label() == raw || key.column() == raw)
            .unwrap_or_default()
    }

    // Ties fall back to id so equal values keep their id order. ORDER BY is
    // qualified so it sorts on the stored column, not the TEXT cast.
    fn list_query(self) -> &'static str {
        match self {
            SortKey::Id => concat!(select_products!(), " ORDER BY products.id ASC"),
            SortKey::Name => concat!(
                select_products!(),
                " ORDER BY products.product_name ASC, products.id ASC"
            ),
            SortKey::Barcode => concat!(
                select_products!(),
                " ORDER BY products.barcode ASC, products.id ASC"
            ),
            SortKey::ExpiryDate => concat!(
                select_products!(),
                " ORDER BY products.expiry_date ASC, products.id ASC"
            ),
            SortKey::Status => concat!(
                select_products!(),
                " ORDER BY products.status ASC, products.id ASC"
            ),
        }
    }
}

const GET_PRODUCT: &str = concat!(select_products!(), " WHERE products.id = ?");

/// Read-only product queries
#[derive(Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All products, ascending by the column behind `sort_key`
    pub async fn list_products(&self, sort_key: SortKey) -> Result<Vec<Product>, StoreError> {
        // connection goes back to the pool when this call returns
        let mut conn = self.pool.acquire().await?;
        let products = sqlx::query_as::<_, Product>(sort_key.list_query())
            .fetch_all(&mut *conn)
            .await?;
        Ok(products)
    }

    /// Look up a single product by id
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let product = sqlx::query_as::<_, Product>(GET_PRODUCT)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(product)
    }

    /// Cheap round trip used by the health endpoint
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
