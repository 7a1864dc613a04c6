use once_cell::sync::Lazy;
use regex::Regex;
use semindex_core::DefinitionCapture;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());

/// Markdown gets no tree-sitter grammar; headings are found by a dedicated
/// line scan instead. A heading's span runs to the line before the next
/// heading of any level, or end of file. Markdown chunks are exempt from
/// `MIN_COMPONENT_LINES` (see chunk invariant 1).
pub fn headings(lines: &[&str]) -> Vec<DefinitionCapture> {
  let heading_lines: Vec<u32> = lines
    .iter()
    .enumerate()
    .filter(|(_, line)| HEADING_RE.is_match(line))
    .map(|(i, _)| i as u32)
    .collect();

  let mut out = Vec::with_capacity(heading_lines.len());
  for (idx, &start_line) in heading_lines.iter().enumerate() {
    let end_line = heading_lines
      .get(idx + 1)
      .map(|&next| next.saturating_sub(1))
      .unwrap_or(lines.len().saturating_sub(1) as u32);
    let end_line = end_line.max(start_line);
    out.push(DefinitionCapture {
      start_line,
      end_line,
      header_line: lines[start_line as usize].to_string(),
      name: None,
    });
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_headings_of_any_level() {
    let text = "# Title\nintro text\n\n## Section\nbody\nmore body\n\n## Section 2\nlast\n";
    let lines: Vec<&str> = text.lines().collect();
    let caps = headings(&lines);
    assert_eq!(caps.len(), 3);
    assert_eq!(caps[0].start_line, 0);
    assert_eq!(caps[0].end_line, 2);
    assert_eq!(caps[1].start_line, 3);
    assert_eq!(caps[1].end_line, 6);
    assert_eq!(caps[2].start_line, 7);
  }

  #[test]
  fn no_headings_yields_no_captures() {
    let text = "just prose\nno headings here\n";
    let lines: Vec<&str> = text.lines().collect();
    assert!(headings(&lines).is_empty());
  }
}
