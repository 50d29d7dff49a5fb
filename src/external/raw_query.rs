use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// The one literal query the `/iris` endpoint forwards. The endpoint takes no
/// caller input; the query string goes to the engine verbatim.
pub const IRIS_QUERY: &str = "SELECT * FROM iris";

/// Raw-query seam: forward a literal SQL string to an external engine and
/// hand back whatever rows it yields, serialized generically.
#[async_trait]
pub trait RawQueryEngine: Send + Sync {
    async fn execute(&self, query: &str) -> Result<Vec<Value>>;
}

/// SQLx-backed engine pointed at the vendor database URL. The vendor driver
/// itself stays behind this seam; nothing in the CRUD core touches it.
pub struct SqlQueryEngine {
    pool: sqlx::SqlitePool,
}

impl SqlQueryEngine {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(SqlQueryEngine { pool })
    }
}

#[async_trait]
impl RawQueryEngine for SqlQueryEngine {
    async fn execute(&self, query: &str) -> Result<Vec<Value>> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

// Column types are unknown ahead of time, so decode by the engine's reported
// type: column name -> dynamically typed JSON value, blobs as base64.
fn row_to_json(row: &SqliteRow) -> Value {
    let mut object = serde_json::Map::new();

    for (index, column) in row.columns().iter().enumerate() {
        let value = match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => Value::Null,
            Ok(raw) => match raw.type_info().name() {
                "INTEGER" => row
                    .try_get::<i64, _>(index)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "REAL" => row
                    .try_get::<f64, _>(index)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "BLOB" => row
                    .try_get::<Vec<u8>, _>(index)
                    .map(|bytes| {
                        Value::from(base64::engine::general_purpose::STANDARD.encode(bytes))
                    })
                    .unwrap_or(Value::Null),
                _ => row
                    .try_get::<String, _>(index)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            },
            Err(_) => Value::Null,
        };
        object.insert(column.name().to_string(), value);
    }

    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn executes_literal_and_serializes_rows_generically() {
        let engine = SqlQueryEngine::connect("sqlite::memory:").await.unwrap();
        sqlx::query(
            "CREATE TABLE iris (
                sepal_length REAL,
                species TEXT,
                sample_count INTEGER,
                note TEXT
            )",
        )
        .execute(&engine.pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO iris VALUES (5.1, 'setosa', 50, NULL)")
            .execute(&engine.pool)
            .await
            .unwrap();

        let rows = engine.execute(IRIS_QUERY).await.unwrap();
        assert_eq!(
            rows,
            vec![json!({
                "sepal_length": 5.1,
                "species": "setosa",
                "sample_count": 50,
                "note": null
            })]
        );
    }

    #[tokio::test]
    async fn engine_errors_surface_to_the_caller() {
        let engine = SqlQueryEngine::connect("sqlite::memory:").await.unwrap();
        assert!(engine.execute("SELECT * FROM no_such_table").await.is_err());
    }
}
