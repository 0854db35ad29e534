/*!
 * Tests for reading subtitle input and writing the bilingual output
 */

use std::fs;

use bisrt::errors::AppError;
use bisrt::file_utils::FileManager;
use crate::common;

/// A missing input is a dedicated error carrying the path
#[test]
fn test_read_input_withMissingFile_shouldReturnInputNotFound() {
    let dir = common::create_temp_dir().unwrap();
    let missing = dir.path().join("nope.srt");

    match FileManager::read_input(&missing) {
        Err(AppError::InputNotFound(path)) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Existing input is returned untouched
#[test]
fn test_read_input_withExistingFile_shouldReturnContent() {
    let dir = common::create_temp_dir().unwrap();
    let content = common::srt_content(3);
    let path = common::create_test_file(dir.path(), "movie.srt", &content).unwrap();

    assert_eq!(FileManager::read_input(&path).unwrap(), content);
}

/// Output is trimmed and missing parent directories are created
#[test]
fn test_write_output_withNestedPath_shouldTrimAndCreateDirs() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("out").join("movie.zh-CN.srt");

    FileManager::write_output(&path, "\n\n1\nHello\n你好\n\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "1\nHello\n你好");
}

/// The output path sits next to the input with the suffix before the extension
#[test]
fn test_generate_output_path_withTempInput_shouldStayInSameDirectory() {
    let dir = common::create_temp_dir().unwrap();
    let input = dir.path().join("Episode 01.srt");

    let output = FileManager::generate_output_path(&input, "zh-CN");

    assert_eq!(output, dir.path().join("Episode 01.zh-CN.srt"));
}

/// A hidden file named only `.srt` gets its whole name as the stem and never overwrites itself
#[test]
fn test_generate_output_path_withDotfileInput_shouldAppendSuffixToWholeName() {
    let dir = common::create_temp_dir().unwrap();
    let input = dir.path().join(".srt");

    let output = FileManager::generate_output_path(&input, "zh-CN");

    assert_eq!(output, dir.path().join(".srt.zh-CN.srt"));
    assert_ne!(output, input);
}
