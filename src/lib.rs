/*!
 * # bisrt - bilingual subtitles with an LLM
 *
 * Turns a line-timed subtitle file (SRT) into a bilingual English + Chinese
 * version by sending it, chunk by chunk, to a text-completion service.
 *
 * ## Pipeline
 *
 * 1. `subtitle_processor` splits the file into blank-line separated blocks
 *    and groups them into chunks of at least `min_blocks_per_chunk` blocks.
 * 2. `translation::pipeline` sends chunks one after another (or with bounded
 *    concurrency) through `translation::core::TranslationService`, which
 *    retries each chunk with a growing timeout and exponential backoff.
 * 3. Chunks that still fail are dropped with a diagnostic; the rest are
 *    joined in source order and written next to the input by `file_utils`.
 *
 * ## Modules
 *
 * - `app_config`: Configuration management (defaults, JSON file, environment)
 * - `app_controller`: Runs the whole workflow for one file
 * - `providers`: Completion service clients (`openai`, `mock`)
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AppError, ProviderError, TranslationError};
pub use subtitle_processor::{SubtitleBlock, SubtitleChunk, SubtitleCollection};
pub use translation::{ChunkPipeline, PipelineResult, RetryPolicy, TranslationService};
