use std::str::FromStr;

use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Opens the SQLite pool every component shares.
///
/// `case_sensitive_like` keeps the listing filters case-sensitive, and
/// foreign keys must stay enabled for the delete cascades to hold.
/// In-memory databases are pinned to a single connection so every
/// handle sees the same schema.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(conn_err)?
        .create_if_missing(true)
        .foreign_keys(true)
        .pragma("case_sensitive_like", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(if url.contains(":memory:") { 1 } else { 5 })
        .connect_with(options)
        .await
        .map_err(conn_err)?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

fn conn_err(err: sqlx::Error) -> DbErr {
    DbErr::Conn(RuntimeErr::Internal(err.to_string()))
}
