use anyhow::{Result, ensure};
use arrow_array::{RecordBatch, RecordBatchIterator, FixedSizeListArray, StringArray, TimestampMillisecondArray};
use chrono::Utc;
use lancedb::Connection;
use std::sync::Arc;

use talkscore_core::types::KnowledgeBaseEntry;

use crate::schema::build_kb_schema;
use crate::table::{ensure_table, open_db};

const BATCH_SIZE: usize = 1000;

/// Stable id for an entry that arrives without one.
pub fn entry_id(entry: &KnowledgeBaseEntry) -> String {
	let mut hasher = blake3::Hasher::new();
	hasher.update(entry.category.as_str().as_bytes());
	hasher.update(b"\0");
	hasher.update(entry.text.as_bytes());
	hasher.finalize().to_hex().to_string()
}

/// Appends pre-embedded entries to a knowledge-base table.
pub struct KnowledgeBaseWriter { db: Connection, table_name: String, dim: usize }

impl KnowledgeBaseWriter {
	pub async fn open(uri: &str, table_name: &str, dim: usize) -> Result<Self> {
		ensure!(dim > 0, "embedding dim must be positive");
		let db = open_db(uri).await?;
		ensure_table(&db, table_name, build_kb_schema(i32::try_from(dim)?)).await?;
		Ok(Self { db, table_name: table_name.to_string(), dim })
	}

	pub async fn add_entries(&self, entries: &[KnowledgeBaseEntry]) -> Result<usize> {
		if entries.is_empty() { return Ok(0); }
		for e in entries {
			ensure!(e.embedding.len() == self.dim, "entry '{}' has dim {} but table expects {}", e.text, e.embedding.len(), self.dim);
		}
		let table = self.db.open_table(&self.table_name).execute().await?;
		for batch in entries.chunks(BATCH_SIZE) {
			let record_batch = self.to_record_batch(batch)?;
			let schema = record_batch.schema();
			let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
			table.add(reader).execute().await?;
		}
		tracing::info!(table = %self.table_name, added = entries.len(), "knowledge base entries written");
		Ok(entries.len())
	}

	fn to_record_batch(&self, entries: &[KnowledgeBaseEntry]) -> Result<RecordBatch> {
		let schema = build_kb_schema(i32::try_from(self.dim)?);
		let now = Utc::now().timestamp_millis();
		let mut ids = Vec::new(); let mut texts = Vec::new(); let mut categories = Vec::new(); let mut sources = Vec::new();
		let mut metadata: Vec<Option<String>> = Vec::new(); let mut created = Vec::new();
		let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
		for e in entries {
			ids.push(if e.id.is_empty() { entry_id(e) } else { e.id.clone() });
			texts.push(e.text.clone());
			categories.push(e.category.as_str().to_string());
			sources.push(e.source.clone());
			metadata.push(if e.metadata.is_null() { None } else { Some(e.metadata.to_string()) });
			created.push(now);
			vectors.push(Some(e.embedding.iter().map(|&x| Some(x)).collect()));
		}
		let record_batch = RecordBatch::try_new(schema, vec![
			Arc::new(StringArray::from(ids)),
			Arc::new(StringArray::from(texts)),
			Arc::new(StringArray::from(categories)),
			Arc::new(StringArray::from(sources)),
			Arc::new(StringArray::from(metadata)),
			Arc::new(TimestampMillisecondArray::from(created)),
			Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors.into_iter(), i32::try_from(self.dim)?)),
		])?;
		Ok(record_batch)
	}
}
