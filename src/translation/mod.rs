/*!
 * Translation of subtitle chunks through a completion provider.
 *
 * - `core`: the translation service (one chunk, with retries)
 * - `pipeline`: dispatch of all chunks and ordered merging of results
 * - `prompts`: the instruction prompt sent with every chunk
 * - `retry`: timeout and backoff schedule
 */

// Re-export main types for easier usage
pub use self::core::{TranslationService, TranslationState};
pub use self::pipeline::{ChunkPipeline, PipelineResult};
pub use self::retry::RetryPolicy;

// Submodules
pub mod core;
pub mod pipeline;
pub mod prompts;
pub mod retry;
