use crate::models::{ConsumptionRecord, InventoryItem};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Connection, FromRow, Row, SqliteConnection};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

const SELECT_CONSUMPTION: &str = "SELECT * FROM consumo_pc";
const SELECT_INVENTORY: &str = "SELECT * FROM inventario";
const INSERT_INVENTORY: &str = "INSERT INTO inventario (aparato, watts) VALUES (?, ?)";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// The collector owns the schema, so cells go through SQLite's own
// coercion instead of sqlx's declared-type check (an INTEGER 42 in a load
// column, or segundos_uso declared REAL, must still decode).
impl<'r> FromRow<'r, SqliteRow> for ConsumptionRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get_unchecked::<i64, _>("id")?,
            fecha: row.try_get_unchecked::<String, _>("fecha")?,
            hora_inicio: row.try_get_unchecked::<String, _>("hora_inicio")?,
            hora_fin: row.try_get_unchecked::<String, _>("hora_fin")?,
            kwh_consumidos: row.try_get_unchecked::<f64, _>("kwh_consumidos")?,
            segundos_uso: row.try_get_unchecked::<i64, _>("segundos_uso")?,
            carga_cpu_promedio: row.try_get_unchecked::<Option<f64>, _>("carga_cpu_promedio")?,
            carga_gpu_promedio: row.try_get_unchecked::<Option<f64>, _>("carga_gpu_promedio")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for InventoryItem {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get_unchecked::<i64, _>("id")?,
            aparato: row.try_get_unchecked::<String, _>("aparato")?,
            watts: row.try_get_unchecked::<i64, _>("watts")?,
        })
    }
}

pub async fn read_consumption(db_path: &Path) -> Vec<ConsumptionRecord> {
    read_rows(db_path, SELECT_CONSUMPTION).await
}

pub async fn read_inventory(db_path: &Path) -> Vec<InventoryItem> {
    read_rows(db_path, SELECT_INVENTORY).await
}

/// Missing file or failed query reads as an empty table; the failure is only logged.
pub async fn read_rows<T>(db_path: &Path, query: &str) -> Vec<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    if !fs::try_exists(db_path).await.unwrap_or(false) {
        debug!(path = %db_path.display(), "database file not found");
        return Vec::new();
    }

    match fetch_rows(db_path, query).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(path = %db_path.display(), query, "query failed, showing no data: {err}");
            Vec::new()
        }
    }
}

async fn fetch_rows<T>(db_path: &Path, query: &str) -> Result<Vec<T>, StorageError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut conn = connect(db_path, false).await?;
    let rows = sqlx::query_as::<_, T>(query).fetch_all(&mut conn).await;
    let closed = conn.close().await;
    let rows = rows?;
    closed?;
    Ok(rows)
}

pub async fn insert_inventory(
    db_path: &Path,
    aparato: &str,
    watts: i64,
) -> Result<InventoryItem, StorageError> {
    let mut conn = connect(db_path, true).await?;

    let mut tx = conn.begin().await?;
    let result = sqlx::query(INSERT_INVENTORY)
        .bind(aparato)
        .bind(watts)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    conn.close().await?;

    Ok(InventoryItem {
        id: result.last_insert_rowid(),
        aparato: aparato.to_string(),
        watts,
    })
}

async fn connect(db_path: &Path, create: bool) -> Result<SqliteConnection, StorageError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(create);
    Ok(SqliteConnection::connect_with(&options).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unique_db_path() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("energy_storage_{}_{}.db", std::process::id(), nanos))
    }

    async fn create_schema(path: &Path) {
        let mut conn = connect(path, true).await.unwrap();
        sqlx::query(
            "CREATE TABLE consumo_pc (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fecha TEXT,
                hora_inicio TEXT,
                hora_fin TEXT,
                kwh_consumidos REAL,
                segundos_uso INTEGER,
                carga_cpu_promedio REAL,
                carga_gpu_promedio REAL
            )",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE inventario (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                aparato TEXT,
                watts INTEGER
            )",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_database_reads_as_empty() {
        let path = unique_db_path();
        assert!(read_consumption(&path).await.is_empty());
        assert!(read_inventory(&path).await.is_empty());
        assert!(!path.exists(), "reads must not create the database file");
    }

    #[tokio::test]
    async fn missing_table_reads_as_empty() {
        let path = unique_db_path();
        let mut conn = connect(&path, true).await.unwrap();
        sqlx::query("CREATE TABLE otra (id INTEGER PRIMARY KEY)")
            .execute(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        assert!(read_consumption(&path).await.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn consumption_rows_decode_with_nullable_loads() {
        let path = unique_db_path();
        create_schema(&path).await;

        let mut conn = connect(&path, false).await.unwrap();
        sqlx::query(
            "INSERT INTO consumo_pc (fecha, hora_inicio, hora_fin, kwh_consumidos, segundos_uso, carga_cpu_promedio, carga_gpu_promedio)
             VALUES ('2026-10-19', '10:00:00', '10:15:00', 0.12, 900, 42.0, NULL)",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        conn.close().await.unwrap();

        let rows = read_consumption(&path).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].hora_fin, "10:15:00");
        assert_eq!(rows[0].segundos_uso, 900);
        assert_eq!(rows[0].carga_cpu_promedio, Some(42.0));
        assert_eq!(rows[0].carga_gpu_promedio, None);

        let _ = std::fs::remove_file(&path);
    }

    async fn read_single_row(create_table: &str, insert: &str) -> Vec<ConsumptionRecord> {
        let path = unique_db_path();
        let mut conn = connect(&path, true).await.unwrap();
        sqlx::query(create_table).execute(&mut conn).await.unwrap();
        sqlx::query(insert).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();

        let rows = read_consumption(&path).await;
        let _ = std::fs::remove_file(&path);
        rows
    }

    #[tokio::test]
    async fn untyped_columns_decode_integer_loads() {
        let rows = read_single_row(
            "CREATE TABLE consumo_pc (id, fecha, hora_inicio, hora_fin, kwh_consumidos, segundos_uso, carga_cpu_promedio, carga_gpu_promedio)",
            "INSERT INTO consumo_pc VALUES (1, '2026-10-19', '10:00:00', '10:15:00', 0.12, 900, 42, NULL)",
        )
        .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].segundos_uso, 900);
        assert_eq!(rows[0].carga_cpu_promedio, Some(42.0));
        assert_eq!(rows[0].carga_gpu_promedio, None);
    }

    #[tokio::test]
    async fn real_seconds_column_decodes() {
        let rows = read_single_row(
            "CREATE TABLE consumo_pc (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fecha TEXT,
                hora_inicio TEXT,
                hora_fin TEXT,
                kwh_consumidos REAL,
                segundos_uso REAL,
                carga_cpu_promedio REAL,
                carga_gpu_promedio REAL
            )",
            "INSERT INTO consumo_pc (fecha, hora_inicio, hora_fin, kwh_consumidos, segundos_uso, carga_cpu_promedio, carga_gpu_promedio)
             VALUES ('2026-10-19', '10:00:00', '10:15:00', 1, 900, 12.5, 3)",
        )
        .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].segundos_uso, 900);
        assert_eq!(rows[0].kwh_consumidos, 1.0);
        assert_eq!(rows[0].carga_gpu_promedio, Some(3.0));
    }

    #[tokio::test]
    async fn inserted_inventory_item_is_readable() {
        let path = unique_db_path();
        create_schema(&path).await;

        let item = insert_inventory(&path, "Monitor", 30).await.unwrap();
        assert_eq!(item.aparato, "Monitor");

        let items = read_inventory(&path).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], item);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn insert_without_table_is_an_error() {
        let path = unique_db_path();
        let err = insert_inventory(&path, "Monitor", 30).await;
        assert!(err.is_err());

        let _ = std::fs::remove_file(&path);
    }
}
