//! Connection and table bootstrap for the knowledge-base store.

use anyhow::{Context, Result};
use arrow_array::{RecordBatch, RecordBatchIterator};
use arrow_schema::{ArrowError, SchemaRef};
use lancedb::{connect, Connection};

pub async fn open_db(uri: &str) -> Result<Connection> {
	connect(uri).execute().await.with_context(|| format!("connecting to {uri}"))
}

pub async fn table_exists(db: &Connection, name: &str) -> Result<bool> {
	let names = db.table_names().execute().await?;
	Ok(names.iter().any(|n| n == name))
}

/// Creates an empty `name` table with `schema` unless one already exists.
pub async fn ensure_table(db: &Connection, name: &str, schema: SchemaRef) -> Result<()> {
	if table_exists(db, name).await? {
		return Ok(());
	}
	let empty = RecordBatchIterator::new(std::iter::empty::<Result<RecordBatch, ArrowError>>(), schema);
	db.create_table(name, Box::new(empty)).execute().await?;
	tracing::info!(table = name, "created knowledge base table");
	Ok(())
}

/// Rows in `name`; a missing table counts as empty.
pub async fn count_rows(db: &Connection, name: &str) -> Result<usize> {
	if !table_exists(db, name).await? {
		return Ok(0);
	}
	let table = db.open_table(name).execute().await?;
	Ok(table.count_rows(None).await?)
}
