use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

// @module: File and directory utilities

/// Extension used when the input file has none
const DEFAULT_EXTENSION: &str = "srt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path next to the input file
    // @params: input_file, suffix (e.g. "zh-CN")
    //
    // `movie.en.srt` becomes `movie.en.zh-CN.srt`; an input without an
    // extension gets `.srt`.
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, suffix: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(&extension);

        match input_file.parent() {
            Some(dir) => dir.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Read a subtitle file to a string
    ///
    /// A missing file is reported as `AppError::InputNotFound` so the caller
    /// can print a dedicated message.
    pub fn read_input<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::InputNotFound(path.to_path_buf()),
            _ => AppError::File(format!("Failed to read file {:?}: {}", path, e)),
        })
    }

    /// Write a string to a file, trimmed of surrounding whitespace
    pub fn write_output<P: AsRef<Path>>(path: P, content: &str) -> Result<(), AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent).map_err(|e| AppError::File(e.to_string()))?;
        }

        fs::write(path, content.trim())
            .map_err(|e| AppError::File(format!("Failed to write to file {:?}: {}", path, e)))
    }
}
