use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use semindex_core::DefinitionCapture;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::language::GrammarLanguage;

/// Minimum span, in lines, a capture must have to survive. Carried as a
/// parameter rather than a process-wide constant so callers (and tests) can
/// vary it freely.
pub fn process_captures(
  tree: &Tree,
  query: &Query,
  source: &[u8],
  lines: &[&str],
  language: GrammarLanguage,
  min_component_lines: u32,
) -> Vec<DefinitionCapture> {
  let mut cursor = QueryCursor::new();
  let mut seen: HashSet<(u32, u32)> = HashSet::new();
  let mut out: Vec<DefinitionCapture> = Vec::new();

  let mut matches = cursor.matches(query, tree.root_node(), source);
  while let Some(m) = matches.next() {
    for capture in m.captures {
      let capture_name = &query.capture_names()[capture.index as usize];

      // Step 1: keep only `definition.*` / `name.*` captures. `parent` is
      // consumed separately below, never treated as a definition on its own.
      let is_definition = capture_name.contains("definition");
      let is_name = capture_name.starts_with("name");
      if !is_definition && !is_name {
        continue;
      }

      // Step 2: resolve the relevant node — parent of the identifier for
      // `name.*`, the node itself for `definition.*`.
      let node = if is_name {
        match capture.node.parent() {
          Some(p) => p,
          None => continue,
        }
      } else {
        capture.node
      };

      try_emit(node, lines, min_component_lines, language, &mut seen, &mut out);

      // Step 7: for a surviving `name.*` capture, also emit the enclosing
      // parent definition range (e.g. the class around a method) if new.
      if is_name
        && let Some(parent_def) = enclosing_definition(node)
      {
        try_emit(parent_def, lines, min_component_lines, language, &mut seen, &mut out);
      }
    }
  }

  // Step 8: outer definitions before inner ones.
  out.sort_by(|a, b| a.start_line.cmp(&b.start_line).then(b.end_line.cmp(&a.end_line)));
  out
}

/// Attempts to add `node`'s span to `out`, applying the span filter, the
/// JSX/TSX HTML-element filter, and the `(startLine, endLine)` dedup key.
fn try_emit(
  node: Node,
  lines: &[&str],
  min_component_lines: u32,
  language: GrammarLanguage,
  seen: &mut HashSet<(u32, u32)>,
  out: &mut Vec<DefinitionCapture>,
) {
  let start_line = node.start_position().row as u32;
  let end_line = node.end_position().row as u32;
  let span = end_line - start_line + 1;

  // Step 4.
  if span < min_component_lines {
    return;
  }

  // Step 6: JSX/TSX-only HTML element filter, checked against the
  // definition's first line.
  if language.is_jsx() {
    let first_line = lines.get(start_line as usize).copied().unwrap_or_default();
    if html_element_re().is_match(first_line) {
      return;
    }
  }

  // Step 5: dedup by (startLine, endLine) only — intentionally not also
  // keyed by node kind, so two definitions sharing a range collide and the
  // first one wins.
  if !seen.insert((start_line, end_line)) {
    return;
  }

  let header_line = lines.get(start_line as usize).copied().unwrap_or_default().to_string();
  out.push(DefinitionCapture {
    start_line,
    end_line,
    header_line,
    name: None,
  });
}

/// Walks up from a resolved `name.*` node to find the nearest ancestor that
/// is itself a definition node (identified heuristically: a node whose
/// parent relationship mirrors a `definition.*`-shaped construct). We treat
/// any ancestor two levels up from the immediate parent as the enclosing
/// definition candidate (e.g. method -> class body -> class), matching the
/// `parent` capture convention used by the tag queries in `queries.rs`.
fn enclosing_definition(node: Node) -> Option<Node> {
  let mut cur = node.parent()?;
  // Skip intermediate body/list wrapper nodes to reach the actual
  // definition node (e.g. `declaration_list`, `class_body`, `block`).
  while let Some(parent) = cur.parent() {
    if parent.parent().is_some() {
      cur = parent;
    } else {
      break;
    }
    // A definition-shaped node generally has a `name` child; once we find
    // one, stop climbing.
    if cur.child_by_field_name("name").is_some() {
      return Some(cur);
    }
  }
  None
}

static HTML_ELEMENT_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r#"^[^A-Z]*</?(div|span|button|input|h[1-6]|p|a|img|ul|li|form)\b"#).unwrap());

fn html_element_re() -> &'static Regex {
  &HTML_ELEMENT_RE
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::ParserRegistry;
  use tree_sitter::Parser;

  #[test]
  fn html_element_regex_drops_lowercase_tags_but_keeps_components() {
    assert!(html_element_re().is_match("  <div className=\"x\">"));
    assert!(!html_element_re().is_match("const Button = () => ("));
  }

  #[test]
  fn rust_function_definitions_are_captured() {
    let source = "fn first() {\n    let x = 1;\n    let y = 2;\n    x + y\n}\n\nfn second() {\n    let z = 3;\n    z\n}\n";
    let registry = ParserRegistry::new();
    let entry = registry.get("rs").unwrap().unwrap();
    let mut parser = Parser::new();
    parser.set_language(&entry.language).unwrap();
    let tree = parser.parse(source, None).unwrap();
    let lines: Vec<&str> = source.lines().collect();

    let caps = process_captures(&tree, &entry.query, source.as_bytes(), &lines, GrammarLanguage::Rust, 4);

    assert!(caps.iter().any(|c| c.start_line == 0));
  }
}
