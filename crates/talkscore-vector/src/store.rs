//! LanceDB-backed knowledge base.
//!
//! Rows are filtered by category with a predicate pushed down to Lance. The
//! synchronous `KnowledgeBase` impl drives the async query on the runtime the
//! store was opened on, so it must be called from outside async context
//! (e.g. inside `tokio::task::spawn_blocking`).

use anyhow::{Result, anyhow};
use arrow_array::cast::AsArray;
use arrow_array::{Array, FixedSizeListArray, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::Connection;
use lancedb::query::{ExecutableQuery, QueryBase};
use tokio::runtime::Handle;

use talkscore_core::traits::KnowledgeBase;
use talkscore_core::types::{Category, KnowledgeBaseEntry};

use crate::table::{count_rows, open_db, table_exists};

pub struct LanceKnowledgeBase { db: Connection, table_name: String, handle: Handle }

impl LanceKnowledgeBase {
	/// Open an existing table. Must be called inside a tokio runtime.
	pub async fn open(uri: &str, table_name: &str) -> Result<Self> {
		let db = open_db(uri).await?;
		if !table_exists(&db, table_name).await? {
			return Err(anyhow!("knowledge base table '{}' not found at {}", table_name, uri));
		}
		tracing::info!(uri, table = table_name, "opened knowledge base");
		Ok(Self { db, table_name: table_name.to_string(), handle: Handle::current() })
	}

	pub async fn len(&self) -> Result<usize> { count_rows(&self.db, &self.table_name).await }

	pub async fn lookup_async(&self, category: Category) -> Result<Vec<KnowledgeBaseEntry>> {
		let table = self.db.open_table(&self.table_name).execute().await?;
		let filter = format!("category = '{}'", category.as_str());
		let mut stream = table.query().only_if(filter).execute().await?;
		let mut entries = Vec::new();
		while let Some(batch) = stream.try_next().await? {
			entries.extend(decode_batch(&batch, category)?);
		}
		tracing::debug!(%category, entries = entries.len(), "knowledge base lookup");
		Ok(entries)
	}
}

impl KnowledgeBase for LanceKnowledgeBase {
	fn lookup_by_category(&self, category: Category) -> Result<Vec<KnowledgeBaseEntry>> {
		self.handle.block_on(self.lookup_async(category))
	}
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
	batch.column_by_name(name).and_then(|c| c.as_any().downcast_ref::<StringArray>()).ok_or_else(|| anyhow!("missing {} column", name))
}

fn decode_batch(batch: &RecordBatch, category: Category) -> Result<Vec<KnowledgeBaseEntry>> {
	let ids = string_col(batch, "id")?;
	let texts = string_col(batch, "text")?;
	let sources = string_col(batch, "source")?;
	let metadata = string_col(batch, "metadata")?;
	let vectors = batch.column_by_name("vector").and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>()).ok_or_else(|| anyhow!("missing vector column"))?;
	let mut out = Vec::with_capacity(batch.num_rows());
	for i in 0..batch.num_rows() {
		if vectors.is_null(i) {
			tracing::warn!(id = ids.value(i), "skipping knowledge base row without vector");
			continue;
		}
		let embedding = vectors.value(i).as_primitive::<arrow_array::types::Float32Type>().values().to_vec();
		let metadata = if metadata.is_null(i) { serde_json::Value::Null } else { serde_json::from_str(metadata.value(i))? };
		out.push(KnowledgeBaseEntry {
			id: ids.value(i).to_string(),
			text: texts.value(i).to_string(),
			category,
			embedding,
			metadata,
			source: sources.value(i).to_string(),
		});
	}
	Ok(out)
}
