use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use tree_sitter::{Language, Query};

use crate::language::GrammarLanguage;

#[derive(Error, Debug)]
pub enum RegistryError {
  #[error("failed to compile tag query for {0:?}: {1}")]
  QueryCompile(GrammarLanguage, tree_sitter::QueryError),
}

/// A loaded grammar entry: the tree-sitter language plus its compiled tag
/// query, loaded and compiled exactly once per process.
pub struct GrammarEntry {
  pub language: Language,
  pub query: Query,
}

/// Loads tree-sitter grammars and their tag queries per file extension,
/// memoized so repeat lookups for the same extension are free.
///
/// Unknown extensions, and extensions in the supported set with no grammar
/// wired up (e.g. `.vue`, `.toml`), yield `None`; callers silently skip such
/// files rather than treating it as an error.
#[derive(Default)]
pub struct ParserRegistry {
  loaded: RwLock<HashMap<&'static str, Option<&'static GrammarEntry>>>,
}

impl ParserRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Look up the grammar entry for a lowercased, dot-free extension.
  pub fn get(&self, ext: &str) -> Result<Option<&'static GrammarEntry>, RegistryError> {
    let Some(lang) = GrammarLanguage::from_extension(ext) else {
      return Ok(None);
    };

    // `ext` always maps to the same `GrammarLanguage`, and loading the same
    // language twice is wasted work, so cache by the language's extension
    // rather than by `GrammarLanguage` itself (avoids extra Hash/Eq impls).
    // Looked up by borrowed `&str` first so a cache hit never leaks.
    if let Some(cached) = self.loaded.read().unwrap().get(ext) {
      return Ok(*cached);
    }

    let entry = Self::load(lang)?;
    let leaked: &'static GrammarEntry = Box::leak(Box::new(entry));
    let cache_key = leak_ext(ext);
    self.loaded.write().unwrap().insert(cache_key, Some(leaked));
    Ok(Some(leaked))
  }

  fn load(lang: GrammarLanguage) -> Result<GrammarEntry, RegistryError> {
    let language = lang.tree_sitter_language();
    let query =
      Query::new(&language, lang.tag_query()).map_err(|e| RegistryError::QueryCompile(lang, e))?;
    Ok(GrammarEntry { language, query })
  }
}

/// Extensions are drawn from a small fixed set (see `SUPPORTED_EXTENSIONS`),
/// so leaking the first occurrence of each is bounded and acceptable — it
/// avoids cloning a `String` key on every cache hit for the life of the
/// process.
fn leak_ext(ext: &str) -> &'static str {
  Box::leak(ext.to_string().into_boxed_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loads_and_caches_rust() {
    let registry = ParserRegistry::new();
    let first = registry.get("rs").unwrap();
    assert!(first.is_some());
    let second = registry.get("rs").unwrap();
    assert!(second.is_some());
  }

  #[test]
  fn unknown_extension_yields_none() {
    let registry = ParserRegistry::new();
    assert!(registry.get("xyz").unwrap().is_none());
  }

  #[test]
  fn registered_but_ungrammared_extension_yields_none() {
    let registry = ParserRegistry::new();
    assert!(registry.get("toml").unwrap().is_none());
    assert!(registry.get("vue").unwrap().is_none());
  }
}
