use sha2::{Digest, Sha256};

/// Stable content hash: SHA-256 truncated to 128 bits, hex-encoded (32 chars).
///
/// Used for `FileDescriptor::content_hash` and `CodeChunk::content_hash`.
pub fn content_hash_hex(bytes: &[u8]) -> String {
  let digest = Sha256::digest(bytes);
  hex_prefix(&digest, 16)
}

/// Manifest fingerprint: the first 16 hex characters of the content hash.
///
/// Kept derived from the same digest rather than a second hash function so a
/// file's manifest entry and its chunk content hash never disagree about
/// whether the bytes changed.
pub fn manifest_hash_hex(bytes: &[u8]) -> String {
  let full = content_hash_hex(bytes);
  full[..16].to_string()
}

/// Deterministic chunk id over `(relPath, startLine, endLine, contentHash)`.
///
/// Stable across runs, operating systems, and byte-identical workspace paths
/// because it depends only on the relative path and content hash, never on
/// absolute filesystem layout.
pub fn chunk_id(rel_path: &str, start_line: u32, end_line: u32, content_hash: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(rel_path.as_bytes());
  hasher.update(b"\0");
  hasher.update(start_line.to_le_bytes());
  hasher.update(b"\0");
  hasher.update(end_line.to_le_bytes());
  hasher.update(b"\0");
  hasher.update(content_hash.as_bytes());
  hex_prefix(&hasher.finalize(), 16)
}

/// Hash an arbitrary string down to the first `n` bytes (`2n` hex chars).
///
/// Grounds the vector-store collection-naming scheme (`ws-<16 hex>`), which
/// hashes the absolute workspace path the same way.
pub fn hash_hex_prefix(input: &str, hex_chars: usize) -> String {
  let digest = Sha256::digest(input.as_bytes());
  hex_prefix(&digest, hex_chars / 2)
}

fn hex_prefix(digest: &[u8], bytes: usize) -> String {
  digest[..bytes.min(digest.len())]
    .iter()
    .map(|b| format!("{b:02x}"))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn content_hash_is_stable_and_32_chars() {
    let a = content_hash_hex(b"fn main() {}");
    let b = content_hash_hex(b"fn main() {}");
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
  }

  #[test]
  fn content_hash_differs_on_change() {
    assert_ne!(content_hash_hex(b"a"), content_hash_hex(b"b"));
  }

  #[test]
  fn manifest_hash_is_16_chars_and_prefix_of_content_hash() {
    let full = content_hash_hex(b"some file bytes");
    let manifest = manifest_hash_hex(b"some file bytes");
    assert_eq!(manifest.len(), 16);
    assert!(full.starts_with(&manifest));
  }

  #[test]
  fn chunk_id_is_deterministic() {
    let a = chunk_id("src/main.rs", 2, 11, "abc123");
    let b = chunk_id("src/main.rs", 2, 11, "abc123");
    assert_eq!(a, b);
  }

  #[test]
  fn chunk_id_changes_with_any_component() {
    let base = chunk_id("src/main.rs", 2, 11, "abc123");
    assert_ne!(base, chunk_id("src/other.rs", 2, 11, "abc123"));
    assert_ne!(base, chunk_id("src/main.rs", 3, 11, "abc123"));
    assert_ne!(base, chunk_id("src/main.rs", 2, 12, "abc123"));
    assert_ne!(base, chunk_id("src/main.rs", 2, 11, "def456"));
  }

  #[test]
  fn collection_name_hash_is_16_hex_chars() {
    let name = hash_hex_prefix("/home/user/project", 16);
    assert_eq!(name.len(), 16);
    assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
