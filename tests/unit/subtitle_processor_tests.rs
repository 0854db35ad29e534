/*!
 * Tests for block splitting and chunk building
 */

use std::path::PathBuf;
use bisrt::subtitle_processor::{build_chunks, SubtitleBlock, SubtitleCollection};
use crate::common;

/// Blank-line separated entries become one block each
#[test]
fn test_parse_blocks_withSrtContent_shouldYieldOneBlockPerEntry() {
    let content = common::srt_content(12);
    let blocks = SubtitleCollection::parse_blocks(&content);

    assert_eq!(blocks.len(), 12);
    assert_eq!(blocks[0].as_str(), common::srt_block(1));
    assert_eq!(blocks[11].as_str(), common::srt_block(12));
}

/// Every segment between separators is trimmed and blank ones disappear
#[test]
fn test_parse_blocks_withMixedSeparators_shouldCountNonEmptySegments() {
    let segments = ["  first  ", "second\nline", "", "\t", "third"];
    let content = segments.join("\r\n\r\n\r\n");

    let blocks = SubtitleCollection::parse_blocks(&content);
    let texts: Vec<&str> = blocks.iter().map(SubtitleBlock::as_str).collect();

    let expected: Vec<&str> = segments.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    assert_eq!(texts, expected);
}

/// A file without blank lines is a single block
#[test]
fn test_parse_blocks_withoutBlankLine_shouldYieldWholeInput() {
    let content = "\n1\n00:00:01,000 --> 00:00:02,000\nHello\nWorld\n";
    let blocks = SubtitleCollection::parse_blocks(content);

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].as_str(), content.trim());
}

/// A file saved with a byte order mark yields a clean first block
#[test]
fn test_parse_blocks_withByteOrderMark_shouldStripItFromFirstBlock() {
    let content = format!("\u{feff}{}", common::srt_content(3));

    let blocks = SubtitleCollection::parse_blocks(&content);

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].as_str(), common::srt_block(1));
    assert!(!blocks.iter().any(|b| b.as_str().contains('\u{feff}')));
}

/// Collection keeps its source path and block count
#[test]
fn test_from_content_withSrtContent_shouldKeepSourceAndBlocks() {
    let collection = SubtitleCollection::from_content(PathBuf::from("movie.srt"), &common::srt_content(3));

    assert_eq!(collection.source_file, PathBuf::from("movie.srt"));
    assert_eq!(collection.len(), 3);
    assert!(!collection.is_empty());
}

/// 120 blocks with a minimum of 50 become chunks of 50 and 70
#[test]
fn test_split_into_chunks_with120Blocks_shouldMergeTrailingRun() {
    let collection = SubtitleCollection::from_content(PathBuf::from("a.srt"), &common::srt_content(120));
    let chunks = collection.split_into_chunks(50);

    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![50, 70]);
    assert_eq!(chunks[1].blocks[0].as_str(), common::srt_block(51));
    assert_eq!(chunks[1].blocks[69].as_str(), common::srt_block(120));
}

/// N = 2M - 1 merges into a single chunk
#[test]
fn test_build_chunks_withTwiceMinimumMinusOne_shouldYieldSingleChunk() {
    let blocks = SubtitleCollection::parse_blocks(&common::srt_content(99));
    let chunks = build_chunks(&blocks, 50);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].len(), 99);
}

/// Chunk text is what the service receives: blocks joined by blank lines
#[test]
fn test_chunk_to_text_withParsedBlocks_shouldRoundTripToSource() {
    let content = common::srt_content(5);
    let blocks = SubtitleCollection::parse_blocks(&content);
    let chunks = build_chunks(&blocks, 50);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].to_text(), content.trim());
}

/// Empty input produces no chunks at all
#[test]
fn test_build_chunks_withNoBlocks_shouldYieldNothing() {
    assert!(build_chunks(&[], 50).is_empty());
}
