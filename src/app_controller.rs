use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::{ChunkPipeline, PipelineResult, TranslationService};

// @module: Application controller for subtitle processing

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Where the bilingual file was written
    pub output_path: PathBuf,
    /// Blocks read from the input
    pub total_blocks: usize,
    /// Chunks sent to the service
    pub total_chunks: usize,
    /// Merged pipeline output
    pub result: PipelineResult,
}

/// Main application controller for bilingual subtitle generation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Whether to draw a progress bar
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self {
            config,
            show_progress: false,
        })
    }

    /// Draw a progress bar across chunks while translating
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the workflow against the OpenAI Responses API
    pub async fn run(&self, input_file: &Path, output_file: Option<PathBuf>) -> Result<RunSummary, AppError> {
        let service = TranslationService::from_config(&self.config)?;
        self.run_with_service(&service, input_file, output_file).await
    }

    /// Run the workflow with an explicit translation service
    pub async fn run_with_service<P: Provider>(
        &self,
        service: &TranslationService<P>,
        input_file: &Path,
        output_file: Option<PathBuf>,
    ) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();

        info!("1. Reading subtitle file from: {:?}", input_file);
        let content = FileManager::read_input(input_file)?;

        let subtitles = SubtitleCollection::from_content(input_file.to_path_buf(), &content);
        info!("2. Sliced the file into {} blocks.", subtitles.len());

        let min_blocks = self.config.min_blocks_per_chunk;
        let chunks = subtitles.split_into_chunks(min_blocks);
        info!(
            "3. Prepared {} chunk(s) for translation (each >= {} blocks where possible).",
            chunks.len(),
            min_blocks
        );

        let pipeline = ChunkPipeline::new(service, self.config.concurrent_requests)
            .with_progress(self.progress_bar());
        let result = pipeline.run(&chunks).await?;

        if !result.is_complete() {
            let dropped: Vec<String> = result.dropped_chunks.iter().map(|i| i.to_string()).collect();
            warn!(
                "{} of {} chunk(s) failed and were skipped ({}). The output file is incomplete.",
                result.dropped_chunks.len(),
                chunks.len(),
                dropped.join(", ")
            );
        }

        let output_path = output_file
            .unwrap_or_else(|| FileManager::generate_output_path(input_file, &self.config.output_suffix));
        info!("4. All blocks processed. Writing bilingual subtitles to: {:?}", output_path);
        FileManager::write_output(&output_path, &result.text)?;

        info!(
            "Done in {:.1}s: {} of {} chunk(s) translated.",
            start_time.elapsed().as_secs_f64(),
            result.translated_chunks,
            chunks.len()
        );

        Ok(RunSummary {
            output_path,
            total_blocks: subtitles.len(),
            total_chunks: chunks.len(),
            result,
        })
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }
}
