use ignore::WalkBuilder;
use rayon::prelude::*;
use semindex_core::FileDescriptor;
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of a full workspace scan.
#[derive(Debug)]
pub struct ScanResult {
  pub files: Vec<FileDescriptor>,
  pub skipped_count: u32,
  pub scan_duration: Duration,
}

/// Gitignore-aware recursive scanner. Walks the tree honoring
/// `.gitignore`/global/exclude rules plus an optional custom ignore
/// filename, then filters to the fixed supported-extension list.
pub struct Scanner {
  max_file_size: u64,
  follow_links: bool,
}

impl Default for Scanner {
  fn default() -> Self {
    Self::new()
  }
}

impl Scanner {
  pub fn new() -> Self {
    Self {
      max_file_size: 4 * 1024 * 1024,
      follow_links: false,
    }
  }

  pub fn with_max_file_size(mut self, size: u64) -> Self {
    self.max_file_size = size;
    self
  }

  /// Scan `root`, returning a [`FileDescriptor`] for every readable,
  /// non-empty, size-bounded file with a recognized extension.
  pub fn scan(&self, root: &Path) -> ScanResult {
    let start = Instant::now();

    let walker = WalkBuilder::new(root)
      .follow_links(self.follow_links)
      .hidden(false)
      .git_ignore(true)
      .git_global(true)
      .git_exclude(true)
      .add_custom_ignore_filename(".semindexignore")
      .build();

    let entries: Vec<_> = walker.filter_map(|e| e.ok()).collect();
    let max_file_size = self.max_file_size;

    let results: Vec<Option<FileDescriptor>> = entries
      .into_par_iter()
      .map(|entry| {
        let path = entry.path();
        if entry.file_type().is_none_or(|ft| ft.is_dir()) {
          return None;
        }

        let ext = path.extension()?.to_str()?.to_lowercase();
        if !parser::SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
          return None;
        }

        let metadata = entry.metadata().ok()?;
        if metadata.len() == 0 || metadata.len() > max_file_size {
          return None;
        }

        let bytes = std::fs::read(path).ok()?;
        let rel_path = path.strip_prefix(root).ok()?.to_string_lossy().replace('\\', "/");
        let abs_path = path.to_string_lossy().to_string();
        Some(FileDescriptor::new(abs_path, rel_path, &bytes))
      })
      .collect();

    let skipped_count = results.iter().filter(|r| r.is_none()).count() as u32;
    let files: Vec<FileDescriptor> = results.into_iter().flatten().collect();

    ScanResult {
      files,
      skipped_count,
      scan_duration: start.elapsed(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn scan_finds_supported_extensions_only() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let scanner = Scanner::new();
    let result = scanner.scan(dir.path());
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].rel_path, "main.rs");
  }

  #[test]
  fn scan_respects_gitignore() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".gitignore"), "ignored/\n").unwrap();
    std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    std::fs::create_dir(dir.path().join("ignored")).unwrap();
    std::fs::write(dir.path().join("ignored/hidden.rs"), "fn hidden() {}").unwrap();

    let scanner = Scanner::new();
    let result = scanner.scan(dir.path());
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].rel_path, "main.rs");
  }

  #[test]
  fn scan_skips_empty_and_oversized_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("empty.rs"), "").unwrap();
    std::fs::write(dir.path().join("big.rs"), "x".repeat(10)).unwrap();

    let scanner = Scanner::new().with_max_file_size(5);
    let result = scanner.scan(dir.path());
    assert!(result.files.is_empty());
    assert_eq!(result.skipped_count, 2);
  }
}
