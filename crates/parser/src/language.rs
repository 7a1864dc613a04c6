/// The fixed set of extensions the indexer recognizes, per the external
/// interface contract. Lowercased, without the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
  "tla", "js", "jsx", "ts", "vue", "tsx", "py", "rs", "go", "c", "h", "cpp", "hpp", "cs", "rb", "java", "php",
  "swift", "sol", "kt", "kts", "ex", "exs", "el", "html", "htm", "md", "markdown", "json", "css", "rdl", "ml",
  "mli", "lua", "scala", "toml", "zig", "elm", "ejs", "erb",
];

/// A language the grammar-backed chunker knows how to produce tag captures
/// for. Extensions recognized by [`SUPPORTED_EXTENSIONS`] but not listed here
/// (e.g. `.vue`, `.kt`, `.toml`) are accepted by the scanner/watcher but yield
/// zero chunks from the tree-sitter path, same as any other unknown
/// extension — see `ParserRegistry::get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarLanguage {
  Rust,
  JavaScript,
  Jsx,
  TypeScript,
  Tsx,
  Python,
  Go,
  C,
  Cpp,
  CSharp,
  Ruby,
  Java,
  Php,
}

impl GrammarLanguage {
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext {
      "rs" => Some(Self::Rust),
      "js" => Some(Self::JavaScript),
      "jsx" => Some(Self::Jsx),
      "ts" => Some(Self::TypeScript),
      "tsx" => Some(Self::Tsx),
      "py" => Some(Self::Python),
      "go" => Some(Self::Go),
      "c" | "h" => Some(Self::C),
      "cpp" | "hpp" => Some(Self::Cpp),
      "cs" => Some(Self::CSharp),
      "rb" => Some(Self::Ruby),
      "java" => Some(Self::Java),
      "php" => Some(Self::Php),
      _ => None,
    }
  }

  /// Whether this language's definitions are matched via a JSX-aware grammar,
  /// relevant to the HTML-element capture filter (step 6 of tag capture).
  pub fn is_jsx(&self) -> bool {
    matches!(self, Self::Jsx | Self::Tsx)
  }

  pub fn tree_sitter_language(&self) -> tree_sitter::Language {
    match self {
      Self::Rust => tree_sitter_rust::LANGUAGE.into(),
      Self::JavaScript | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
      Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
      Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
      Self::Python => tree_sitter_python::LANGUAGE.into(),
      Self::Go => tree_sitter_go::LANGUAGE.into(),
      Self::C => tree_sitter_c::LANGUAGE.into(),
      Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
      Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
      Self::Ruby => tree_sitter_ruby::LANGUAGE.into(),
      Self::Java => tree_sitter_java::LANGUAGE.into(),
      Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
    }
  }

  /// The tag query source for this language: `definition.*`/`name.*`/
  /// `parent` captures consumed by the tag-capture processor.
  pub fn tag_query(&self) -> &'static str {
    match self {
      Self::Rust => crate::queries::RUST,
      Self::JavaScript | Self::Jsx | Self::TypeScript | Self::Tsx => crate::queries::JS_FAMILY,
      Self::Python => crate::queries::PYTHON,
      Self::Go => crate::queries::GO,
      Self::C | Self::Cpp => crate::queries::C_FAMILY,
      Self::CSharp => crate::queries::CSHARP,
      Self::Ruby => crate::queries::RUBY,
      Self::Java => crate::queries::JAVA,
      Self::Php => crate::queries::PHP,
    }
  }
}
