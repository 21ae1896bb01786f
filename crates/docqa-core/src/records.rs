//! JSON-lines chunk and metadata stores.
//!
//! One `{"doc_id", "chunk_id", "text"}` object per line. The metadata store
//! uses the same schema and is positionally aligned with the vector store:
//! line `i` describes vector `i`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Chunk;

pub fn write_records(path: &Path, chunks: &[Chunk]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read every record in file order. Blank lines are skipped; a malformed
/// line fails with `Load` naming its line number.
pub fn read_records(path: &Path) -> Result<Vec<Chunk>> {
    let file = File::open(path).map_err(|e| Error::Load(format!("cannot open {}: {e}", path.display())))?;
    let mut chunks = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let chunk: Chunk = serde_json::from_str(&line)
            .map_err(|e| Error::Load(format!("{}:{}: {e}", path.display(), line_no + 1)))?;
        chunks.push(chunk);
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn records_keep_order_and_unicode() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("chunks.jsonl");
        let chunks = vec![Chunk::new("b.md", 0, "naïve café"), Chunk::new("a.txt", 3, "line one\nline two")];
        write_records(&path, &chunks).expect("write");

        let raw = std::fs::read_to_string(&path).expect("raw");
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains("naïve café"), "non-ASCII written unescaped");

        assert_eq!(read_records(&path).expect("read"), chunks);
    }

    #[test]
    fn malformed_line_reports_position() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("metadata.jsonl");
        std::fs::write(&path, "{\"doc_id\":\"a\",\"chunk_id\":0,\"text\":\"x\"}\n\nnot json\n").expect("write");
        let err = read_records(&path).expect_err("bad line");
        match err {
            Error::Load(msg) => assert!(msg.contains(":3:"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_store_is_a_load_error() {
        let tmp = TempDir::new().expect("tmp");
        assert!(matches!(read_records(&tmp.path().join("nope.jsonl")), Err(Error::Load(_))));
    }
}
