use serde_json::json;

use talkscore_core::traits::{Embedder, KnowledgeBase};
use talkscore_core::types::{Category, KnowledgeBaseEntry};
use talkscore_embed::HashEmbedder;
use talkscore_vector::{entry_id, KnowledgeBaseWriter, LanceKnowledgeBase, MemoryKnowledgeBase};

const DIM: usize = 32;

fn fixture() -> Vec<KnowledgeBaseEntry> {
    let embedder = HashEmbedder::new(DIM);
    [
        (Category::Science, "What do you think will happen if we add more water?"),
        (Category::Science, "Let's measure how tall the plant grew."),
        (Category::Social, "Can you share the blocks with your friend?"),
        (Category::Literature, "Who was your favourite character in the story?"),
    ]
    .into_iter()
    .map(|(category, text)| KnowledgeBaseEntry {
        id: String::new(),
        text: text.to_string(),
        category,
        embedding: embedder.embed_batch(&[text.to_string()]).unwrap().remove(0),
        metadata: json!({ "grade": "pre-k" }),
        source: "fixture".to_string(),
    })
    .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn lance_store_filters_by_category() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let entries = fixture();

    let writer = KnowledgeBaseWriter::open(&uri, "kb", DIM).await?;
    assert_eq!(writer.add_entries(&entries).await?, 4);

    let kb = LanceKnowledgeBase::open(&uri, "kb").await?;
    assert_eq!(kb.len().await?, 4);

    let science = kb.lookup_async(Category::Science).await?;
    assert_eq!(science.len(), 2);
    for e in &science {
        assert_eq!(e.category, Category::Science);
        assert_eq!(e.embedding.len(), DIM);
        assert_eq!(e.metadata["grade"], "pre-k");
        assert_eq!(e.source, "fixture");
        assert_eq!(e.id, entry_id(&KnowledgeBaseEntry { id: String::new(), ..e.clone() }));
    }
    assert!(kb.lookup_async(Category::Language).await?.is_empty());

    let kb = std::sync::Arc::new(kb);
    let social = tokio::task::spawn_blocking({
        let kb = kb.clone();
        move || kb.lookup_by_category(Category::Social)
    })
    .await??;
    assert_eq!(social.len(), 1);
    assert_eq!(social[0].text, "Can you share the blocks with your friend?");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_table_is_an_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    assert!(LanceKnowledgeBase::open(&uri, "absent").await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn writer_rejects_wrong_dimension() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let writer = KnowledgeBaseWriter::open(&uri, "kb", DIM + 1).await?;
    assert!(writer.add_entries(&fixture()).await.is_err());
    Ok(())
}

#[test]
fn memory_store_groups_entries() {
    let kb = MemoryKnowledgeBase::new(fixture());
    assert_eq!(kb.len(), 4);
    assert_eq!(kb.lookup_by_category(Category::Science).unwrap().len(), 2);
    assert_eq!(kb.lookup_by_category(Category::Literature).unwrap().len(), 1);
    assert!(kb.lookup_by_category(Category::Language).unwrap().is_empty());
}
