//! Artifact names and binary layouts for the index directory.

pub const CHUNKS_FILE: &str = "chunks.jsonl";
pub const VECTORS_FILE: &str = "vectors.bin";
pub const METADATA_FILE: &str = "metadata.jsonl";
pub const INDEX_FILE: &str = "index.bin";

/// `index.bin`: magic, `dimension: u64`, `count: u64`, row-major f32 LE
/// payload, then a blake3 digest of every preceding byte.
pub const INDEX_MAGIC: &[u8; 8] = b"DQFLAT01";
pub const INDEX_HEADER_LEN: usize = INDEX_MAGIC.len() + 16;
pub const DIGEST_LEN: usize = 32;

/// `vectors.bin`: `n: u64`, `d: u64`, then `n * d` f32 LE values.
pub const VECTORS_HEADER_LEN: usize = 16;

pub(crate) fn encode_f32s(out: &mut Vec<u8>, values: &[f32]) {
    out.reserve(std::mem::size_of_val(values));
    for &value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

pub(crate) fn decode_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()
}

pub(crate) fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}
