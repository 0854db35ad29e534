/*!
 * Common test utilities for the bisrt test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use bisrt::app_config::Config;
use bisrt::translation::RetryPolicy;

/// Route library logs to the test output once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// One SRT entry with a unique caption
pub fn srt_block(index: usize) -> String {
    let start = index * 3;
    format!(
        "{}\n{:02}:{:02}:{:02},000 --> {:02}:{:02}:{:02},500\nCaption number {}",
        index,
        start / 3600,
        (start / 60) % 60,
        start % 60,
        start / 3600,
        (start / 60) % 60,
        (start + 2) % 60,
        index
    )
}

/// SRT content with `count` entries separated by blank lines
pub fn srt_content(count: usize) -> String {
    let mut content = (1..=count).map(srt_block).collect::<Vec<_>>().join("\n\n");
    content.push('\n');
    content
}

/// Configuration usable by the controller, with short timings
pub fn test_config() -> Config {
    Config {
        api_key: "sk-test".to_string(),
        timeout_ms: 10_000,
        retry_backoff_ms: 1000,
        ..Config::default()
    }
}

/// Retry policy with 3 attempts, 10s base timeout and 1s backoff
pub fn test_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_timeout: Duration::from_secs(10),
        backoff_base: Duration::from_secs(1),
    }
}
