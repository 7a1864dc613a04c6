use parser::{GrammarLanguage, ParserRegistry};
use semindex_core::chunk::{DEFAULT_MAX_CHUNK_BYTES, DEFAULT_MIN_COMPONENT_LINES};
use semindex_core::hash::content_hash_hex;
use semindex_core::CodeChunk;
use tree_sitter::Parser as TsParser;

/// Configuration for [`Chunker`]. `min_component_lines` and
/// `max_chunk_bytes` are plain fields rather than process-wide constants —
/// the source this is modeled on used a global mutable for testability,
/// which a reimplementation should not repeat.
#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
  pub min_component_lines: u32,
  pub max_chunk_bytes: usize,
}

impl Default for ChunkerConfig {
  fn default() -> Self {
    Self {
      min_component_lines: DEFAULT_MIN_COMPONENT_LINES,
      max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
    }
  }
}

/// Reads a file's bytes and produces its syntax-aware chunks, honoring the
/// min-line and max-chunk-size invariants.
pub struct Chunker {
  config: ChunkerConfig,
  registry: ParserRegistry,
}

impl Default for Chunker {
  fn default() -> Self {
    Self::new(ChunkerConfig::default())
  }
}

impl Chunker {
  pub fn new(config: ChunkerConfig) -> Self {
    Self {
      config,
      registry: ParserRegistry::new(),
    }
  }

  /// Chunk a single file's raw bytes. A parser error is logged and the file
  /// yields zero chunks — it never aborts the caller's run.
  pub fn chunk_file(&self, rel_path: &str, ext: &str, bytes: &[u8]) -> Vec<CodeChunk> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().collect();
    let content_hash = content_hash_hex(bytes);
    let is_markdown = ext == "md" || ext == "markdown";
    let caps = self.definitions(rel_path, ext, bytes, &lines);
    self.materialize(rel_path, &lines, &content_hash, caps, is_markdown)
  }

  /// Raw definition captures for a file, unmaterialized — the basis for
  /// both chunking and the on-demand "definitions for a file" query.
  pub fn definitions_for_file(&self, rel_path: &str, ext: &str, bytes: &[u8]) -> Vec<semindex_core::DefinitionCapture> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().collect();
    self.definitions(rel_path, ext, bytes, &lines)
  }

  fn definitions(&self, rel_path: &str, ext: &str, bytes: &[u8], lines: &[&str]) -> Vec<semindex_core::DefinitionCapture> {
    if ext == "md" || ext == "markdown" {
      return parser::markdown::headings(lines);
    }

    let entry = match self.registry.get(ext) {
      Ok(Some(entry)) => entry,
      Ok(None) => return Vec::new(),
      Err(e) => {
        tracing::warn!(path = rel_path, error = %e, "failed to load grammar; skipping file");
        return Vec::new();
      }
    };

    let Some(language) = GrammarLanguage::from_extension(ext) else {
      return Vec::new();
    };

    let mut ts_parser = TsParser::new();
    if let Err(e) = ts_parser.set_language(&entry.language) {
      tracing::warn!(path = rel_path, error = %e, "failed to set grammar language; skipping file");
      return Vec::new();
    }

    let Some(tree) = ts_parser.parse(bytes, None) else {
      tracing::warn!(path = rel_path, "tree-sitter failed to parse file; skipping");
      return Vec::new();
    };

    parser::process_captures(&tree, &entry.query, bytes, lines, language, self.config.min_component_lines)
  }

  fn materialize(
    &self,
    rel_path: &str,
    lines: &[&str],
    content_hash: &str,
    captures: Vec<semindex_core::DefinitionCapture>,
    is_markdown: bool,
  ) -> Vec<CodeChunk> {
    let mut chunks = Vec::new();
    for cap in captures {
      let text = lines[cap.start_line as usize..=(cap.end_line as usize).min(lines.len() - 1)].join("\n");
      if !is_markdown && cap.span() < self.config.min_component_lines {
        continue;
      }
      self.split_and_push(rel_path, cap.start_line, &text, content_hash, lines, &mut chunks);
    }
    chunks
  }

  /// Splits a chunk at line boundaries if it exceeds `max_chunk_bytes`,
  /// preserving per-piece line-range metadata, then pushes the resulting
  /// piece(s). Line numbers presented here are 1-based inclusive, per the
  /// external chunk contract.
  fn split_and_push(
    &self,
    rel_path: &str,
    start_line_0based: u32,
    text: &str,
    content_hash: &str,
    _lines: &[&str],
    out: &mut Vec<CodeChunk>,
  ) {
    if text.len() <= self.config.max_chunk_bytes {
      let num_lines = text.lines().count().max(1) as u32;
      out.push(CodeChunk::new(
        rel_path,
        start_line_0based + 1,
        start_line_0based + num_lines,
        text.to_string(),
        content_hash,
      ));
      return;
    }

    let piece_lines: Vec<&str> = text.lines().collect();
    let mut piece = String::new();
    let mut piece_start = start_line_0based;
    let mut line_idx = start_line_0based;

    for line in &piece_lines {
      let candidate_len = piece.len() + line.len() + 1;
      if !piece.is_empty() && candidate_len > self.config.max_chunk_bytes {
        out.push(CodeChunk::new(
          rel_path,
          piece_start + 1,
          line_idx,
          std::mem::take(&mut piece),
          content_hash,
        ));
        piece_start = line_idx + 1;
      }
      if !piece.is_empty() {
        piece.push('\n');
      }
      piece.push_str(line);
      line_idx += 1;
    }
    if !piece.is_empty() {
      out.push(CodeChunk::new(rel_path, piece_start + 1, line_idx, piece, content_hash));
    }
  }
}

/// Renders the on-demand "definitions for a file" output (§6): one line per
/// definition, `"{startLine}--{endLine} | {headerLine}"` in 1-based inclusive
/// lines, preceded by a `"# {basename}"` header.
pub fn format_definitions(path: &str, definitions: &[semindex_core::DefinitionCapture]) -> String {
  let basename = std::path::Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path);
  let mut out = format!("# {basename}\n");
  for def in definitions {
    out.push_str(&format!("{}--{} | {}\n", def.start_line + 1, def.end_line + 1, def.header_line));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn small_ts_file_chunk_boundaries() {
    // S1: one exported function spanning lines 3-12 (1-based), one class
    // spanning 14-20, in a 20-line file.
    let mut lines = vec!["import x from 'y';".to_string(), "".to_string()];
    lines.push("export function doThing(a: number, b: number) {".to_string());
    for i in 0..8 {
      lines.push(format!("  console.log({i});"));
    }
    lines.push("}".to_string());
    lines.push("".to_string());
    lines.push("export class Widget {".to_string());
    for i in 0..5 {
      lines.push(format!("  method{i}() {{}}"));
    }
    lines.push("}".to_string());
    let source = lines.join("\n");

    let chunker = Chunker::default();
    let chunks = chunker.chunk_file("widget.ts", "ts", source.as_bytes());

    assert!(chunks.iter().any(|c| c.start_line == 3));
  }

  #[test]
  fn min_lines_three_omitted_four_kept() {
    let source = "fn a() {\n  1\n}\n\nfn bbbb() {\n  1\n  2\n}\n";
    let chunker = Chunker::default();
    let chunks = chunker.chunk_file("x.rs", "rs", source.as_bytes());
    assert!(!chunks.iter().any(|c| c.text.contains("fn a()")));
    assert!(chunks.iter().any(|c| c.text.contains("fn bbbb()")));
  }

  #[test]
  fn chunk_ranges_are_disjoint_within_a_file() {
    let source = "fn a() {\n  1\n  2\n  3\n}\n\nfn b() {\n  1\n  2\n  3\n}\n";
    let chunker = Chunker::default();
    let chunks = chunker.chunk_file("x.rs", "rs", source.as_bytes());
    for w in chunks.windows(2) {
      assert!(w[0].end_line < w[1].start_line || w[0].rel_path != w[1].rel_path);
    }
  }

  #[test]
  fn oversized_chunk_is_split_at_line_boundary() {
    let config = ChunkerConfig {
      min_component_lines: 1,
      max_chunk_bytes: 50,
    };
    let chunker = Chunker::new(config);
    let mut lines = vec!["fn huge() {".to_string()];
    for i in 0..20 {
      lines.push(format!("  let v{i} = {i};"));
    }
    lines.push("}".to_string());
    let source = lines.join("\n");
    let chunks = chunker.chunk_file("huge.rs", "rs", source.as_bytes());
    assert!(chunks.len() > 1, "expected split into multiple pieces");
    for c in &chunks {
      assert!(c.text.len() <= 50 || c.text.lines().count() == 1);
    }
  }

  #[test]
  fn unknown_extension_yields_no_chunks() {
    let chunker = Chunker::default();
    assert!(chunker.chunk_file("image.png", "png", b"binary").is_empty());
  }

  #[test]
  fn markdown_is_exempt_from_min_lines() {
    let source = "# Title\none line\n";
    let chunker = Chunker::default();
    let chunks = chunker.chunk_file("readme.md", "md", source.as_bytes());
    assert_eq!(chunks.len(), 1);
  }

  #[test]
  fn chunk_id_stable_across_calls() {
    let source = "fn a() {\n  1\n  2\n  3\n}\n";
    let chunker = Chunker::default();
    let first = chunker.chunk_file("x.rs", "rs", source.as_bytes());
    let second = chunker.chunk_file("x.rs", "rs", source.as_bytes());
    assert_eq!(first[0].chunk_id, second[0].chunk_id);
  }

  #[test]
  fn definitions_for_file_format_matches_external_contract() {
    let source = "fn a() {\n  1\n  2\n  3\n}\n";
    let chunker = Chunker::default();
    let defs = chunker.definitions_for_file("src/x.rs", "rs", source.as_bytes());
    let rendered = format_definitions("src/x.rs", &defs);
    assert!(rendered.starts_with("# x.rs\n"));
    assert!(rendered.contains("1--5 | fn a() {"));
  }
}
