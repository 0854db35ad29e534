/*!
 * Chunk pipeline: drives chunks through the translation service and merges
 * the results in source order.
 *
 * With a concurrency of 1 (the default) chunk `i + 1` is only dispatched once
 * chunk `i` has succeeded or exhausted its attempts. Higher values run up to
 * N chunks at once and reorder results by chunk index before merging.
 * A chunk that exhausts its attempts is dropped and the run continues.
 */

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::{error, info};

use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::subtitle_processor::{BLOCK_SEPARATOR, SubtitleChunk};

use super::core::TranslationService;

/// Merged output of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineResult {
    /// Translated chunk texts, each trimmed and followed by a blank line
    pub text: String,

    /// Number of chunks that made it into `text`
    pub translated_chunks: usize,

    /// 1-based indices of chunks that were dropped
    pub dropped_chunks: Vec<usize>,
}

impl PipelineResult {
    fn append(&mut self, translated: &str) {
        self.text.push_str(translated.trim());
        self.text.push_str(BLOCK_SEPARATOR);
        self.translated_chunks += 1;
    }

    /// Whether every chunk was translated
    pub fn is_complete(&self) -> bool {
        self.dropped_chunks.is_empty()
    }
}

/// Orchestrates translation of all chunks of one file
pub struct ChunkPipeline<'a, P: Provider> {
    service: &'a TranslationService<P>,
    concurrency: usize,
    progress: ProgressBar,
}

impl<'a, P: Provider> ChunkPipeline<'a, P> {
    /// Create a pipeline with no visible progress bar
    pub fn new(service: &'a TranslationService<P>, concurrency: usize) -> Self {
        Self {
            service,
            concurrency: concurrency.max(1),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-chunk progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Translate every chunk and merge successes in source order
    ///
    /// Only fatal errors (a missing credential) abort the run; all other
    /// chunk failures are recorded in `dropped_chunks`.
    pub async fn run(&self, chunks: &[SubtitleChunk]) -> Result<PipelineResult, TranslationError> {
        self.progress.set_length(chunks.len() as u64);

        let result = if self.concurrency == 1 {
            self.run_sequential(chunks).await
        } else {
            self.run_concurrent(chunks).await
        };

        self.progress.finish_and_clear();
        result
    }

    async fn run_sequential(&self, chunks: &[SubtitleChunk]) -> Result<PipelineResult, TranslationError> {
        let mut result = PipelineResult::default();
        for chunk in chunks {
            let outcome = self.process(chunk, chunks.len()).await;
            self.merge(&mut result, chunk, outcome)?;
        }
        Ok(result)
    }

    async fn run_concurrent(&self, chunks: &[SubtitleChunk]) -> Result<PipelineResult, TranslationError> {
        info!("Dispatching up to {} chunk(s) at once", self.concurrency);

        let mut outcomes = stream::iter(chunks.iter().enumerate())
            .map(|(slot, chunk)| async move { (slot, self.process(chunk, chunks.len()).await) })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        // Completion order is arbitrary; merge by source position
        outcomes.sort_by_key(|(slot, _)| *slot);

        let mut result = PipelineResult::default();
        for (slot, outcome) in outcomes {
            self.merge(&mut result, &chunks[slot], outcome)?;
        }
        Ok(result)
    }

    async fn process(&self, chunk: &SubtitleChunk, total: usize) -> Result<String, TranslationError> {
        info!(
            "- Processing chunk {} of {} (contains {} blocks)",
            chunk.index,
            total,
            chunk.len()
        );
        self.progress.set_message(format!("chunk {}/{}", chunk.index, total));
        let outcome = self.service.translate_chunk(chunk).await;
        self.progress.inc(1);
        outcome
    }

    fn merge(
        &self,
        result: &mut PipelineResult,
        chunk: &SubtitleChunk,
        outcome: Result<String, TranslationError>,
    ) -> Result<(), TranslationError> {
        match outcome {
            Ok(translated) => {
                result.append(&translated);
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!("--- FAILED TO PROCESS CHUNK {} ---", chunk.index);
                error!("This chunk had {} blocks. Last error: {}", chunk.len(), e);
                error!("This chunk will be skipped. The final file may be incomplete.");
                result.dropped_chunks.push(chunk.index);
                Ok(())
            }
        }
    }
}
