//! SQLite sink
//!
//! Stores records in a single `products` table. ASIN is deliberately not
//! unique: the crawler does not deduplicate across pages or keywords, and
//! the table preserves exactly what was emitted.

use crate::output::traits::{ResultSink, SinkResult};
use crate::record::EmittedRecord;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// A sink writing records to a SQLite database
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) the database file
    pub fn open(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better write performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn open_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Returns how many records the sink holds
    pub fn count(&self) -> SinkResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT NOT NULL,
            country TEXT NOT NULL,
            page_index INTEGER NOT NULL,
            asin TEXT NOT NULL,
            title TEXT NOT NULL,
            product_url TEXT NOT NULL,
            price_text TEXT NOT NULL,
            price REAL,
            original_price_text TEXT NOT NULL,
            rating REAL,
            reviews_count INTEGER,
            is_prime INTEGER NOT NULL,
            brand TEXT NOT NULL,
            badges TEXT NOT NULL,
            is_sponsored INTEGER NOT NULL,
            image_url TEXT NOT NULL,
            currency TEXT NOT NULL,
            category_path TEXT,
            feature_bullets TEXT,
            scraped_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_products_keyword ON products(keyword);
        CREATE INDEX IF NOT EXISTS idx_products_asin ON products(asin);
    ",
    )
}

impl ResultSink for SqliteSink {
    fn accept(&mut self, record: &EmittedRecord) -> SinkResult<()> {
        let product = &record.record;
        let badges = serde_json::to_string(&product.badges)?;
        let category_path = product
            .category_path
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let feature_bullets = product
            .feature_bullets
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            "INSERT INTO products (
                keyword, country, page_index, asin, title, product_url,
                price_text, price, original_price_text, rating, reviews_count,
                is_prime, brand, badges, is_sponsored, image_url, currency,
                category_path, feature_bullets, scraped_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                      ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            params![
                record.keyword,
                record.country.code(),
                record.page_index,
                product.asin,
                product.title,
                product.product_url,
                product.price_text,
                product.price,
                product.original_price_text,
                product.rating,
                product.reviews_count,
                product.is_prime,
                product.brand,
                badges,
                product.is_sponsored,
                product.image_url,
                product.currency,
                category_path,
                feature_bullets,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
