use arrow_schema::{Schema, Field, DataType, TimeUnit};
use std::sync::Arc;

/// Arrow layout of a knowledge-base table. `metadata` holds a JSON document.
pub fn build_kb_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("id", DataType::Utf8, false),
		Field::new("text", DataType::Utf8, false),
		Field::new("category", DataType::Utf8, false),
		Field::new("source", DataType::Utf8, false),
		Field::new("metadata", DataType::Utf8, true),
		Field::new("created_at", DataType::Timestamp(TimeUnit::Millisecond, None), false),
		Field::new("vector", DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	]))
}
