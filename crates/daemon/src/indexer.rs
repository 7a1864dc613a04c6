use crate::error::{DaemonError, Result};
use chunker::Chunker;
use controller::{requires_restart, IndexerStateMachine};
use embedding::{create_provider, EmbeddingProvider, ResilientProvider};
use index::{ChangeKind, DebouncedWatcher, Pipeline, PipelineConfig, RunOutcome, Scanner};
use manifest::Manifest;
use semindex_core::{ConfigSnapshot, IndexerState, Progress};
use std::collections::HashMap;
use std::path::PathBuf;
use vectorstore::{collection_name, VectorStoreClient};

type ConfiguredEmbedder = ResilientProvider<Box<dyn EmbeddingProvider>>;

/// Pending changes accumulated from the watcher while a run is in progress,
/// merged and drained once that run completes (§4.H).
#[derive(Debug, Default)]
struct PendingDelta {
  changed: HashMap<String, PathBuf>,
  deleted: HashMap<String, PathBuf>,
}

impl PendingDelta {
  fn record(&mut self, rel_path: String, abs_path: PathBuf, kind: ChangeKind) {
    match kind {
      ChangeKind::Deleted => {
        self.changed.remove(&rel_path);
        self.deleted.insert(rel_path, abs_path);
      }
      ChangeKind::Created | ChangeKind::Modified => {
        self.deleted.remove(&rel_path);
        self.changed.insert(rel_path, abs_path);
      }
    }
  }

  fn is_empty(&self) -> bool {
    self.changed.is_empty() && self.deleted.is_empty()
  }

  fn take(&mut self) -> (Vec<PathBuf>, Vec<String>) {
    let changed: Vec<PathBuf> = self.changed.drain().map(|(_, path)| path).collect();
    let deleted: Vec<String> = self.deleted.drain().map(|(rel_path, _)| rel_path).collect();
    (changed, deleted)
  }
}

/// Top-level façade wiring scanner, chunker, embedder, vector store,
/// manifest, watcher, and the config/state controller into the operations
/// an embedding caller (CLI, IDE extension, service) actually calls.
pub struct Indexer {
  workspace_root: PathBuf,
  manifest_path: PathBuf,
  config: ConfigSnapshot,
  machine: IndexerStateMachine,
  scanner: Scanner,
  store: VectorStoreClient,
  pipeline: Pipeline<ConfiguredEmbedder>,
  watcher: Option<DebouncedWatcher>,
  pending: PendingDelta,
  last_progress: Progress,
}

impl Indexer {
  /// Builds the façade for a workspace. Does not start indexing — call
  /// `start_indexing` once the caller is ready.
  pub fn initialize(workspace_root: PathBuf, cache_dir: PathBuf, config: ConfigSnapshot) -> Result<Self> {
    let manifest_path = cache_dir.join("manifest");
    let embedder = create_provider(&config)?;
    let collection = collection_name(&workspace_root.to_string_lossy());
    let store = VectorStoreClient::new(config.vector_store_url.clone(), config.vector_store_api_key.clone(), collection);
    let pipeline = Pipeline::new(Chunker::default(), embedder, store.clone(), PipelineConfig::default());

    Ok(Self {
      workspace_root,
      manifest_path,
      config,
      machine: IndexerStateMachine::new(),
      scanner: Scanner::new(),
      store,
      pipeline,
      watcher: None,
      pending: PendingDelta::default(),
      last_progress: Progress::new(IndexerState::Standby),
    })
  }

  pub fn current_status(&self) -> &Progress {
    &self.last_progress
  }

  /// Runs a full scan, diffs against the manifest, and processes the
  /// resulting delta. On success the indexer arms the watcher and moves to
  /// `Watching`; on failure it moves to `Error` and the manifest keeps
  /// whatever was durably written before the failing stage.
  pub async fn start_indexing(&mut self) -> Result<RunOutcome> {
    self.machine.start(self.config.enabled && self.config.is_configured()).map_err(|_| DaemonError::NotConfigured)?;

    let dim = embedding::resolve_dimension(&self.config).ok_or(DaemonError::NotConfigured)?;
    self.store.ensure_collection(dim).await?;

    let mut manifest = Manifest::load(&self.manifest_path)?;
    let scan = self.scanner.scan(&self.workspace_root);

    let scanned: HashMap<String, String> = scan
      .files
      .iter()
      .map(|f| (f.rel_path.clone(), f.content_hash.chars().take(16).collect()))
      .collect();
    let diff = manifest.diff(&scanned);

    let to_process: std::collections::HashSet<String> = diff.to_process().into_iter().collect();
    let files_to_chunk = scan.files.into_iter().filter(|f| to_process.contains(&f.rel_path)).collect();

    let pipeline = &self.pipeline;
    let mut last_progress = Progress::new(IndexerState::Indexing);
    let outcome = pipeline
      .run(files_to_chunk, diff.deleted, &mut manifest, |progress| {
        last_progress = progress;
      })
      .await;
    self.last_progress = last_progress;

    let outcome = match outcome {
      Ok(outcome) => outcome,
      Err(e) => {
        self.machine.fail(&e);
        return Err(e.into());
      }
    };

    self.machine.finish().map_err(|_| DaemonError::NotConfigured)?;
    self.watcher = Some(DebouncedWatcher::new(&self.workspace_root)?);
    self.machine.arm_watch().map_err(|_| DaemonError::NotConfigured)?;

    Ok(outcome)
  }

  /// Polls the watcher and, if a run isn't already pending, folds ready
  /// changes into the pending delta for the next drain.
  pub fn poll_watcher(&mut self) {
    let Some(watcher) = self.watcher.as_mut() else {
      return;
    };
    for change in watcher.collect_ready() {
      let rel_path = change
        .path
        .strip_prefix(&self.workspace_root)
        .unwrap_or(&change.path)
        .to_string_lossy()
        .replace('\\', "/");
      self.pending.record(rel_path, change.path, change.kind);
    }
  }

  /// Drains and processes the accumulated watcher delta, keeping the state
  /// machine in `Watching` throughout.
  pub async fn drain_pending(&mut self) -> Result<Option<RunOutcome>> {
    self.poll_watcher();
    if self.pending.is_empty() {
      return Ok(None);
    }

    let (changed_paths, deleted) = self.pending.take();
    let mut manifest = Manifest::load(&self.manifest_path)?;

    let mut files = Vec::with_capacity(changed_paths.len());
    for abs_path in changed_paths {
      let Ok(bytes) = std::fs::read(&abs_path) else { continue };
      let rel_path = abs_path
        .strip_prefix(&self.workspace_root)
        .unwrap_or(&abs_path)
        .to_string_lossy()
        .replace('\\', "/");
      files.push(semindex_core::FileDescriptor::new(abs_path.to_string_lossy().to_string(), rel_path, &bytes));
    }

    let pipeline = &self.pipeline;
    let mut last_progress = Progress::new(IndexerState::Watching);
    let outcome = pipeline
      .run(files, deleted, &mut manifest, |progress| {
        last_progress = progress;
      })
      .await;
    self.last_progress = last_progress;

    match outcome {
      Ok(outcome) => Ok(Some(outcome)),
      Err(e) => {
        self.machine.fail(&e);
        Err(e.into())
      }
    }
  }

  /// Applies a fresh config snapshot (§8/S5). If it requires a restart, the
  /// watcher is torn down, the state machine drops back to `Standby`, and a
  /// full `start_indexing` run is driven immediately so the new config takes
  /// effect right away rather than leaving the indexer merely reset.
  pub async fn apply_config(&mut self, next: ConfigSnapshot) -> Result<bool> {
    let restart_needed = requires_restart(&self.config, &next);
    self.config = next;
    if !restart_needed {
      return Ok(false);
    }

    self.watcher = None;
    self.machine.restart_for_config_change();

    let embedder = create_provider(&self.config)?;
    let collection = collection_name(&self.workspace_root.to_string_lossy());
    self.store = VectorStoreClient::new(self.config.vector_store_url.clone(), self.config.vector_store_api_key.clone(), collection);
    self.pipeline = Pipeline::new(Chunker::default(), embedder, self.store.clone(), PipelineConfig::default());

    self.start_indexing().await?;
    Ok(true)
  }

  pub async fn search_index(&self, query_vector: &[f32], limit: usize) -> Result<Vec<semindex_core::ScoredPoint>> {
    Ok(self.store.search(query_vector, limit, self.config.search_min_score).await?)
  }

  /// Renders the on-demand "definitions for a file" output (§6) for an
  /// absolute path under the workspace.
  pub fn definitions_for_file(&self, abs_path: &std::path::Path) -> Result<String> {
    let rel_path = abs_path
      .strip_prefix(&self.workspace_root)
      .unwrap_or(abs_path)
      .to_string_lossy()
      .replace('\\', "/");
    let ext = abs_path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();
    let bytes = std::fs::read(abs_path).map_err(semindex_core::Error::Io)?;
    let defs = self.pipeline.chunker().definitions_for_file(&rel_path, &ext, &bytes);
    Ok(chunker::format_definitions(&rel_path, &defs))
  }

  pub fn dispose(&mut self) {
    self.watcher = None;
    self.machine.dispose();
  }
}
