use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The set of changes between a disk scan and the manifest recorded on the
/// previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
  pub added: Vec<String>,
  pub modified: Vec<String>,
  pub deleted: Vec<String>,
}

impl ManifestDiff {
  /// Paths that must be (re-)chunked and (re-)embedded this run.
  pub fn to_process(&self) -> Vec<String> {
    self.added.iter().chain(self.modified.iter()).cloned().collect()
  }
}

/// Persistent `relPath -> contentHash` map, one file per workspace under the
/// cache directory. Format: `path<TAB>hex16hash` lines. Read lazily at
/// pipeline start; writes are whole-file via temp-file-plus-rename.
pub struct Manifest {
  path: PathBuf,
  entries: HashMap<String, String>,
}

impl Manifest {
  /// Load the manifest at `path`, or start empty if it doesn't exist yet.
  pub fn load(path: impl Into<PathBuf>) -> std::io::Result<Self> {
    let path = path.into();
    let entries = match std::fs::read_to_string(&path) {
      Ok(contents) => parse(&contents),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
      Err(e) => return Err(e),
    };
    Ok(Self { path, entries })
  }

  pub fn get(&self, rel_path: &str) -> Option<&str> {
    self.entries.get(rel_path).map(String::as_str)
  }

  pub fn set(&mut self, rel_path: impl Into<String>, hash: impl Into<String>) {
    self.entries.insert(rel_path.into(), hash.into());
  }

  pub fn remove(&mut self, rel_path: &str) {
    self.entries.remove(rel_path);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Compute added / modified / deleted against a fresh scan, given as
  /// `relPath -> contentHash`.
  pub fn diff(&self, scanned: &HashMap<String, String>) -> ManifestDiff {
    let mut added = Vec::new();
    let mut modified = Vec::new();
    let scanned_paths: HashSet<&str> = scanned.keys().map(String::as_str).collect();

    for (path, hash) in scanned {
      match self.entries.get(path) {
        None => added.push(path.clone()),
        Some(existing) if existing != hash => modified.push(path.clone()),
        Some(_) => {}
      }
    }

    let deleted: Vec<String> = self
      .entries
      .keys()
      .filter(|p| !scanned_paths.contains(p.as_str()))
      .cloned()
      .collect();

    added.sort();
    modified.sort();
    let mut deleted = deleted;
    deleted.sort();

    ManifestDiff { added, modified, deleted }
  }

  /// Atomically rewrite the manifest file: write to a sibling temp file,
  /// then rename over the target so readers never see a partial write.
  pub fn save(&self) -> std::io::Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    let tmp_path = tmp_path_for(&self.path);
    {
      let mut file = std::fs::File::create(&tmp_path)?;
      let mut sorted: Vec<_> = self.entries.iter().collect();
      sorted.sort_by(|a, b| a.0.cmp(b.0));
      for (path, hash) in sorted {
        writeln!(file, "{path}\t{hash}")?;
      }
      file.sync_all()?;
    }
    std::fs::rename(&tmp_path, &self.path)?;
    Ok(())
  }
}

fn tmp_path_for(path: &Path) -> PathBuf {
  let mut tmp = path.to_path_buf();
  let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("manifest");
  tmp.set_file_name(format!("{file_name}.tmp"));
  tmp
}

fn parse(contents: &str) -> HashMap<String, String> {
  contents
    .lines()
    .filter_map(|line| {
      let mut parts = line.splitn(2, '\t');
      let path = parts.next()?;
      let hash = parts.next()?;
      if path.is_empty() || hash.is_empty() {
        return None;
      }
      Some((path.to_string(), hash.to_string()))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn scanned(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(p, h)| (p.to_string(), h.to_string())).collect()
  }

  #[test]
  fn loading_missing_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let manifest = Manifest::load(dir.path().join("manifest")).unwrap();
    assert!(manifest.is_empty());
  }

  #[test]
  fn round_trips_through_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest");
    let mut manifest = Manifest::load(&path).unwrap();
    manifest.set("src/a.rs", "aaaa1111aaaa1111");
    manifest.set("src/b.rs", "bbbb2222bbbb2222");
    manifest.save().unwrap();

    let reloaded = Manifest::load(&path).unwrap();
    assert_eq!(reloaded.get("src/a.rs"), Some("aaaa1111aaaa1111"));
    assert_eq!(reloaded.len(), 2);
  }

  #[test]
  fn diff_classifies_added_modified_deleted() {
    // Scenario S4: 5 files indexed, then file 2 modified and file 4 deleted.
    let dir = TempDir::new().unwrap();
    let mut manifest = Manifest::load(dir.path().join("manifest")).unwrap();
    for i in 1..=5 {
      manifest.set(format!("file{i}"), format!("hash{i}"));
    }

    let mut next = scanned(&[
      ("file1", "hash1"),
      ("file2", "hash2-new"),
      ("file3", "hash3"),
      ("file5", "hash5"),
    ]);
    next.remove("file4");

    let diff = manifest.diff(&next);
    assert_eq!(diff.modified, vec!["file2".to_string()]);
    assert_eq!(diff.deleted, vec!["file4".to_string()]);
    assert!(diff.added.is_empty());
  }

  #[test]
  fn unchanged_file_is_neither_added_nor_modified() {
    let dir = TempDir::new().unwrap();
    let mut manifest = Manifest::load(dir.path().join("manifest")).unwrap();
    manifest.set("a.rs", "same");
    let next = scanned(&[("a.rs", "same")]);
    let diff = manifest.diff(&next);
    assert!(diff.added.is_empty());
    assert!(diff.modified.is_empty());
    assert!(diff.to_process().is_empty());
  }

  #[test]
  fn new_file_is_added() {
    let dir = TempDir::new().unwrap();
    let manifest = Manifest::load(dir.path().join("manifest")).unwrap();
    let next = scanned(&[("new.rs", "hash")]);
    let diff = manifest.diff(&next);
    assert_eq!(diff.added, vec!["new.rs".to_string()]);
  }
}
