use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use talkscore_core::config::{resolve_with_base, ClassifierConfig, Config};
use talkscore_core::traits::Embedder;
use talkscore_core::types::{Category, KnowledgeBaseEntry};
use talkscore_embed::default_embedder;
use talkscore_hybrid::Pipeline;
use talkscore_semantic::SemanticClassifier;
use talkscore_vector::{KnowledgeBaseWriter, LanceKnowledgeBase};

const USAGE: &str = "Usage: talkscore <analyze <file|->|batch <dir>|weights|seed <jsonl>>";

/// One line of a seed file. Embeddings are computed here, never read.
#[derive(Debug, Deserialize)]
struct SeedRecord {
    text: String,
    category: Category,
    #[serde(default)]
    id: String,
    #[serde(default)]
    metadata: serde_json::Value,
    #[serde(default = "default_source")]
    source: String,
}

fn default_source() -> String { "seed".to_string() }

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn kb_location(settings: &ClassifierConfig) -> anyhow::Result<String> {
    let uri = resolve_with_base(&env::current_dir()?, &settings.knowledge_base.uri);
    Ok(uri.to_string_lossy().into_owned())
}

/// Semantic classifier over the configured store, or `None` when either
/// collaborator is unavailable. Analysis then runs keyword-only.
async fn load_semantic(settings: &ClassifierConfig) -> anyhow::Result<Option<SemanticClassifier>> {
    if !settings.semantic.enabled {
        tracing::info!("semantic classification disabled");
        return Ok(None);
    }
    let embedder: Arc<dyn Embedder> = match default_embedder(&settings.embedding) {
        Ok(e) => Arc::from(e),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "embedder unavailable, keyword scoring only");
            return Ok(None);
        }
    };
    let uri = kb_location(settings)?;
    let kb = match LanceKnowledgeBase::open(&uri, &settings.knowledge_base.table).await {
        Ok(kb) => kb,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "knowledge base unavailable, keyword scoring only");
            return Ok(None);
        }
    };
    Ok(Some(SemanticClassifier::new(embedder, Arc::new(kb), settings.semantic.clone())?))
}

fn read_transcript(arg: &str) -> anyhow::Result<String> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(arg).with_context(|| format!("reading {arg}"))
}

fn transcript_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|x| x == "txt"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

async fn seed(settings: &ClassifierConfig, path: &str) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let records = raw
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(n, l)| serde_json::from_str::<SeedRecord>(l).with_context(|| format!("{path}:{}", n + 1)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if records.is_empty() { bail!("{path} has no entries"); }

    let embedding = settings.embedding.clone();
    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    let (dim, vectors) = tokio::task::spawn_blocking(move || -> anyhow::Result<(usize, Vec<Vec<f32>>)> {
        let embedder = default_embedder(&embedding)?;
        Ok((embedder.dim(), embedder.embed_batch(&texts)?))
    })
    .await??;

    let entries: Vec<KnowledgeBaseEntry> = records
        .into_iter()
        .zip(vectors)
        .map(|(r, embedding)| KnowledgeBaseEntry {
            id: r.id,
            text: r.text,
            category: r.category,
            embedding,
            metadata: r.metadata,
            source: r.source,
        })
        .collect();
    let uri = kb_location(settings)?;
    let writer = KnowledgeBaseWriter::open(&uri, &settings.knowledge_base.table, dim).await?;
    let added = writer.add_entries(&entries).await?;
    eprintln!("Seeded {added} entries into {uri} ({})", settings.knowledge_base.table);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.classifier()?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "weights" => {
            let pipeline = Pipeline::new(&settings, None)?;
            println!("{}", serde_json::to_string(&pipeline.fusion_weights())?);
        }
        "analyze" => {
            let Some(input) = args.first() else { eprintln!("Usage: talkscore analyze <file|->"); std::process::exit(1) };
            let text = read_transcript(input)?;
            let pipeline = Pipeline::new(&settings, load_semantic(&settings).await?)?;
            let analysis = pipeline.analyze(&text).await;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        "batch" => {
            let Some(dir) = args.first().map(PathBuf::from) else { eprintln!("Usage: talkscore batch <dir>"); std::process::exit(1) };
            let files = transcript_files(&dir);
            tracing::info!(dir = %dir.display(), files = files.len(), "batch analysis");
            let pipeline = Pipeline::new(&settings, load_semantic(&settings).await?)?;
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
            for path in files {
                pb.set_message(path.display().to_string());
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        let analysis = pipeline.analyze(&text).await;
                        let line = serde_json::json!({ "path": path.display().to_string(), "analysis": analysis });
                        pb.suspend(|| println!("{line}"));
                    }
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable transcript"),
                }
                pb.inc(1);
            }
            pb.finish_and_clear();
        }
        "seed" => {
            let Some(path) = args.first() else { eprintln!("Usage: talkscore seed <jsonl>"); std::process::exit(1) };
            seed(&settings, path).await?;
        }
        _ => { eprintln!("Unknown command: {}\n{USAGE}", cmd); std::process::exit(1); }
    }
    Ok(())
}
