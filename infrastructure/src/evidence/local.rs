//! Local literature retriever
//!
//! Scans a directory tree of `.md` and `.txt` documents and ranks them by
//! keyword overlap with the clinical notes:
//!
//! ```text
//! relevance(doc) = |keywords(notes) ∩ words(doc)| / |keywords(notes)|
//! ```
//!
//! The excerpt is the paragraph with the most keyword hits. Documents with
//! no overlap are never returned.

use async_trait::async_trait;
use glob::glob;
use medpanel_application::{EvidenceRetriever, RetrievalError};
use medpanel_domain::EvidenceSnippet;
use medpanel_domain::core::string::truncate;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Documents larger than this are skipped (2 MB)
const MAX_DOCUMENT_SIZE: u64 = 2 * 1024 * 1024;

const EXTENSIONS: [&str; 2] = ["md", "txt"];

const STOPWORDS: &[&str] = &[
    "and", "are", "but", "for", "from", "had", "has", "have", "her", "his", "into", "not", "none",
    "of", "one", "patient", "presents", "she", "that", "the", "their", "there", "this", "two",
    "was", "were", "which", "with", "without", "year", "years",
];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("word pattern is valid"));

/// Evidence retriever over a local directory of documents
#[derive(Debug, Clone)]
pub struct LocalEvidenceRetriever {
    directory: PathBuf,
    excerpt_chars: usize,
}

impl LocalEvidenceRetriever {
    pub fn new(directory: impl Into<PathBuf>, excerpt_chars: usize) -> Self {
        Self {
            directory: directory.into(),
            excerpt_chars,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn search(&self, notes: &str, limit: usize) -> Result<Vec<EvidenceSnippet>, RetrievalError> {
        if !self.directory.is_dir() {
            return Err(RetrievalError::Unavailable(format!(
                "{} is not a directory",
                self.directory.display()
            )));
        }

        let keywords = keywords(notes);
        if keywords.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut snippets: Vec<EvidenceSnippet> = collect_documents(&self.directory)?
            .into_iter()
            .filter_map(|path| self.score_document(&path, &keywords))
            .collect();

        snippets.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| a.source.cmp(&b.source))
        });
        snippets.truncate(limit);

        debug!(
            "Retrieved {} snippets from {}",
            snippets.len(),
            self.directory.display()
        );
        Ok(snippets)
    }

    fn score_document(&self, path: &Path, keywords: &BTreeSet<String>) -> Option<EvidenceSnippet> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read evidence document {:?}: {}", path, e);
                return None;
            }
        };

        let hits = words(&content).intersection(keywords).count();
        if hits == 0 {
            return None;
        }

        let excerpt = best_paragraph(&content, keywords);
        let source = path
            .strip_prefix(&self.directory)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        Some(EvidenceSnippet::new(
            source,
            truncate(excerpt, self.excerpt_chars),
            hits as f64 / keywords.len() as f64,
        ))
    }
}

#[async_trait]
impl EvidenceRetriever for LocalEvidenceRetriever {
    async fn retrieve(
        &self,
        notes: &str,
        limit: usize,
    ) -> Result<Vec<EvidenceSnippet>, RetrievalError> {
        let retriever = self.clone();
        let notes = notes.to_string();
        tokio::task::spawn_blocking(move || retriever.search(&notes, limit))
            .await
            .map_err(|e| RetrievalError::Io(e.to_string()))?
    }
}

/// All readable documents under `dir`, sorted by path
fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>, RetrievalError> {
    let pattern = format!("{}/**/*", dir.display());
    let paths = glob(&pattern).map_err(|e| RetrievalError::Io(e.to_string()))?;

    let mut documents: Vec<PathBuf> = paths
        .flatten()
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .filter(|p| fs::metadata(p).is_ok_and(|m| m.len() <= MAX_DOCUMENT_SIZE))
        .collect();
    documents.sort();
    Ok(documents)
}

fn words(text: &str) -> BTreeSet<String> {
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Distinctive words of the notes: at least three characters, no stopwords
fn keywords(notes: &str) -> BTreeSet<String> {
    words(notes)
        .into_iter()
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn best_paragraph<'a>(content: &'a str, keywords: &BTreeSet<String>) -> &'a str {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            let ha = words(a).intersection(keywords).count();
            let hb = words(b).intersection(keywords).count();
            // first paragraph wins ties
            ha.cmp(&hb).then(ib.cmp(ia))
        })
        .map(|(_, p)| p)
        .unwrap_or("")
}
