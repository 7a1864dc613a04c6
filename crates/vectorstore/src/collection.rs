use semindex_core::hash::hash_hex_prefix;

/// Collection name for a workspace: `ws-<first 16 hex of sha256(absPath)>`.
pub fn collection_name(abs_workspace_path: &str) -> String {
  format!("ws-{}", hash_hex_prefix(abs_workspace_path, 16))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_is_stable_and_prefixed() {
    let a = collection_name("/home/user/project");
    let b = collection_name("/home/user/project");
    assert_eq!(a, b);
    assert!(a.starts_with("ws-"));
    assert_eq!(a.len(), "ws-".len() + 16);
  }

  #[test]
  fn different_paths_yield_different_names() {
    assert_ne!(collection_name("/a"), collection_name("/b"));
  }
}
