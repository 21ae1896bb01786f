use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Chunk;

const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md"];

/// Character-window chunking parameters. `overlap` must be below `chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 900, overlap: 150 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfiguration("chunk_size must be greater than 0".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Normalize line endings, collapse runs of 3+ newlines to a single blank
/// line and strip surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            continue;
        }
        if newlines > 0 {
            out.push_str(if newlines >= 3 { "\n\n" } else { &"\n\n"[..newlines] });
            newlines = 0;
        }
        out.push(ch);
    }
    if newlines > 0 {
        out.push_str(if newlines >= 3 { "\n\n" } else { &"\n\n"[..newlines] });
    }
    out.trim().to_string()
}

/// Split `text` into overlapping windows of `chunk_size` characters.
///
/// Windows start at 0 and advance to `end - overlap`; each window is trimmed
/// and dropped if empty. The window that reaches the end of the text is the
/// last one, even when shorter than `chunk_size`.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    config.validate()?;
    let text = clean_text(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // byte offset of every char boundary, plus the end of the string
    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let n = offsets.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < n {
        let end = (start + config.chunk_size).min(n);
        let piece = text[offsets[start]..offsets[end]].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }
        if end == n {
            break;
        }
        start = end.saturating_sub(config.overlap);
    }
    Ok(chunks)
}

/// Reads a document directory and turns every text file into chunks.
#[derive(Debug, Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new(chunking_config: ChunkingConfig) -> Result<Self> {
        chunking_config.validate()?;
        Ok(Self { chunking_config })
    }

    /// Chunk every `.txt`/`.md` file directly under `data_dir`, in path order.
    /// Fails with `NoDocumentsFound` when there is no such file.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let files = list_data_files(data_dir);
        if files.is_empty() {
            return Err(Error::NoDocumentsFound(data_dir.to_path_buf()));
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "processing file {}/{}", file_index + 1, files.len());
            let content = read_file_content(file_path)?;
            let doc_id = doc_id_for(file_path);
            all_chunks.extend(self.process_document(&doc_id, &content)?);
        }
        info!(files = files.len(), chunks = all_chunks.len(), "processed {}", data_dir.display());
        Ok(all_chunks)
    }

    pub fn process_document(&self, doc_id: &str, content: &str) -> Result<Vec<Chunk>> {
        let parts = chunk_text(content, &self.chunking_config)?;
        Ok(parts.into_iter().enumerate().map(|(i, text)| Chunk::new(doc_id, i, text)).collect())
    }
}

/// Files directly under `root` whose name ends in a text extension
/// (case-insensitive), sorted by path. A missing directory yields no files.
pub fn list_data_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn read_file_content(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path)?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => Ok(decode_dropping_invalid(e.as_bytes())),
    }
}

/// Keep the valid UTF-8 runs and drop undecodable bytes.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|c| c.valid()).collect()
}

fn doc_id_for(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string_lossy().to_string())
}
