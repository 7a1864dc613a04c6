use chunker::Chunker;
use embedding::{EmbeddingProvider, DEFAULT_BATCH_SIZE};
use futures::stream::{self, StreamExt};
use manifest::Manifest;
use semindex_core::{CodeChunk, Error, FileDescriptor, Payload, Progress, Result, VectorPoint};
use std::collections::HashMap;
use std::sync::Arc;
use vectorstore::VectorStoreClient;

/// Chunk-count and byte-size caps that bound a single embed-stage batch.
const BATCH_BYTE_CAP: usize = 50 * 1024;

/// Depth of the bounded queue between the embed stage and the single-writer
/// upsert stage — upserts start as soon as the first batch is embedded
/// instead of waiting for every batch to finish.
const EMBED_UPSERT_QUEUE_CAP: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
  pub parallel_files: usize,
  pub parallel_batches: usize,
  pub batch_chunk_cap: usize,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      parallel_files: 4,
      parallel_batches: 2,
      batch_chunk_cap: DEFAULT_BATCH_SIZE,
    }
  }
}

#[derive(Debug, Default, Clone)]
pub struct RunOutcome {
  pub files_chunked: usize,
  pub files_upserted: usize,
  pub files_deleted: usize,
  pub batches_dropped: usize,
}

/// Orchestrates chunk -> batch -> embed -> upsert -> manifest for a set of
/// added/modified files plus a set of deleted paths. A single run; the
/// caller decides whether it was a full scan or a watcher delta.
pub struct Pipeline<E: EmbeddingProvider> {
  chunker: Arc<Chunker>,
  embedder: Arc<E>,
  store: Arc<VectorStoreClient>,
  config: PipelineConfig,
}

impl<E: EmbeddingProvider + 'static> Pipeline<E> {
  pub fn new(chunker: Chunker, embedder: E, store: VectorStoreClient, config: PipelineConfig) -> Self {
    Self {
      chunker: Arc::new(chunker),
      embedder: Arc::new(embedder),
      store: Arc::new(store),
      config,
    }
  }

  /// The chunker this pipeline runs on, shared so callers can serve
  /// on-demand definition queries without a second parser registry.
  pub fn chunker(&self) -> &Chunker {
    &self.chunker
  }

  /// Runs one full pass. `on_progress` is called after every stage
  /// completion with monotonically non-decreasing `processed_items`.
  pub async fn run(
    &self,
    files: Vec<FileDescriptor>,
    deleted: Vec<String>,
    manifest: &mut Manifest,
    mut on_progress: impl FnMut(Progress),
  ) -> Result<RunOutcome> {
    let mut outcome = RunOutcome::default();
    let total_items = files.len() + deleted.len();
    let mut processed_items = 0u32;

    for rel_path in &deleted {
      self.store.delete_by_file_path(rel_path).await?;
      manifest.remove(rel_path);
      manifest.save()?;
      outcome.files_deleted += 1;
      processed_items += 1;
      on_progress(progress_event(processed_items, total_items as u32));
    }

    // Chunk stage: up to `parallel_files` files chunked concurrently.
    let chunker = self.chunker.clone();
    let chunked: Vec<(FileDescriptor, Vec<CodeChunk>)> = stream::iter(files.into_iter())
      .map(|descriptor| {
        let chunker = chunker.clone();
        async move {
          let bytes = tokio::task::spawn_blocking({
            let abs_path = descriptor.abs_path.clone();
            move || std::fs::read(abs_path)
          })
          .await;

          let bytes = match bytes {
            Ok(Ok(bytes)) => bytes,
            _ => {
              tracing::warn!(path = %descriptor.rel_path, "failed to read file; skipping");
              return (descriptor, Vec::new());
            }
          };

          let chunks = chunker.chunk_file(&descriptor.rel_path, &descriptor.ext, &bytes);
          (descriptor, chunks)
        }
      })
      .buffer_unordered(self.config.parallel_files)
      .collect()
      .await;

    outcome.files_chunked = chunked.len();
    processed_items += chunked.len() as u32;
    on_progress(progress_event(processed_items, total_items as u32));

    // Files with zero chunks still need a manifest entry right away — there
    // is no batch for the manifest stage to key off of.
    let mut remaining: HashMap<String, usize> = HashMap::new();
    let mut file_hash: HashMap<String, String> = HashMap::new();
    let mut flat_chunks: Vec<CodeChunk> = Vec::new();

    for (descriptor, chunks) in chunked {
      if chunks.is_empty() {
        manifest.set(descriptor.rel_path.clone(), manifest_fingerprint(&descriptor));
        manifest.save()?;
        continue;
      }
      remaining.insert(descriptor.rel_path.clone(), chunks.len());
      file_hash.insert(descriptor.rel_path.clone(), manifest_fingerprint(&descriptor));
      flat_chunks.extend(chunks);
    }

    // Batch stage: accumulate by count/byte cap, flushed early at file
    // boundaries when the next chunk would overflow the byte cap.
    let batches = build_batches(flat_chunks, self.config.batch_chunk_cap, BATCH_BYTE_CAP);

    // Embed stage (bounded concurrency) feeds a single-writer upsert stage
    // through a bounded channel: the producer task embeds up to
    // `parallel_batches` batches concurrently and blocks once
    // `EMBED_UPSERT_QUEUE_CAP` completed-but-unconsumed batches are queued,
    // so upserts start on the first ready batch instead of waiting for the
    // whole run to finish embedding.
    let embedder = self.embedder.clone();
    let parallel_batches = self.config.parallel_batches;
    let (tx, mut rx) = tokio::sync::mpsc::channel::<Option<(Vec<CodeChunk>, Vec<Vec<f32>>)>>(EMBED_UPSERT_QUEUE_CAP);
    let producer = tokio::spawn(async move {
      let mut embedded = stream::iter(batches.into_iter())
        .map(|batch| {
          let embedder = embedder.clone();
          async move {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            match embedder.embed_batch(&texts).await {
              Ok(response) => Some((batch, response.vectors)),
              Err(e) => {
                tracing::warn!(error = %e, "batch failed to embed after retries; dropping");
                None
              }
            }
          }
        })
        .buffer_unordered(parallel_batches);

      while let Some(item) = embedded.next().await {
        if tx.send(item).await.is_err() {
          break;
        }
      }
    });

    while let Some(result) = rx.recv().await {
      let Some((batch, vectors)) = result else {
        outcome.batches_dropped += 1;
        continue;
      };

      let points: Vec<VectorPoint> = batch
        .iter()
        .zip(vectors.into_iter())
        .map(|(chunk, vector)| VectorPoint {
          id: chunk.chunk_id.clone(),
          vector,
          payload: Payload {
            file_path: chunk.rel_path.clone(),
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            code_chunk: chunk.text.clone(),
            content_hash: chunk.content_hash.clone(),
          },
        })
        .collect();

      // A vector-store failure aborts the run: surface it immediately so the
      // caller can move the state machine to Error. Manifest entries for
      // files not yet durably upserted are never written.
      self.store.upsert_points(&points).await.map_err(|e| {
        tracing::error!(error = %e, "vector-store upsert failed; aborting run");
        e
      })?;

      for chunk in &batch {
        if let Some(count) = remaining.get_mut(&chunk.rel_path) {
          *count -= 1;
          if *count == 0 {
            if let Some(hash) = file_hash.get(&chunk.rel_path) {
              manifest.set(chunk.rel_path.clone(), hash.clone());
              manifest.save()?;
              outcome.files_upserted += 1;
            }
          }
        }
      }

      processed_items += 1;
      on_progress(progress_event(processed_items, total_items as u32));
    }

    producer.await.map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    Ok(outcome)
  }
}

fn manifest_fingerprint(descriptor: &FileDescriptor) -> String {
  descriptor.content_hash.chars().take(16).collect()
}

fn progress_event(processed: u32, total: u32) -> Progress {
  Progress {
    state: semindex_core::IndexerState::Indexing,
    processed_items: processed as u64,
    total_items: total as u64,
    message: String::new(),
  }
}

/// Groups chunks into batches, each capped at `chunk_cap` chunks or
/// `byte_cap` total text bytes, whichever comes first.
fn build_batches(chunks: Vec<CodeChunk>, chunk_cap: usize, byte_cap: usize) -> Vec<Vec<CodeChunk>> {
  let mut batches = Vec::new();
  let mut current: Vec<CodeChunk> = Vec::new();
  let mut current_bytes = 0usize;

  for chunk in chunks {
    let chunk_bytes = chunk.text.len();
    if !current.is_empty() && (current.len() >= chunk_cap || current_bytes + chunk_bytes > byte_cap) {
      batches.push(std::mem::take(&mut current));
      current_bytes = 0;
    }
    current_bytes += chunk_bytes;
    current.push(chunk);
  }
  if !current.is_empty() {
    batches.push(current);
  }
  batches
}
