use std::fmt;
use std::path::PathBuf;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

// @module: Subtitle block splitting and chunk building

// @const: Two or more consecutive line terminators, LF or CRLF
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\r?\n){2,}").expect("block separator regex is valid")
});

/// Separator used when joining blocks back into text
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Byte order mark some editors put at the start of SRT files
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Maximum number of characters shown in a chunk preview
const PREVIEW_MAX_CHARS: usize = 120;

// @struct: One timed-text entry, kept verbatim
//
// Index, timestamp line and caption lines are not parsed; the block is an
// opaque, trimmed, non-empty piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock(String);

impl SubtitleBlock {
    // @creates: Block from raw text, None when blank
    //
    // A byte order mark at either edge is trimmed like whitespace.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// @struct: Consecutive blocks sent together in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleChunk {
    // @field: 1-based position in the run
    pub index: usize,

    // @field: Blocks in source order
    pub blocks: Vec<SubtitleBlock>,
}

impl SubtitleChunk {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // @returns: Blocks joined by a blank line, as sent to the service
    pub fn to_text(&self) -> String {
        self.blocks
            .iter()
            .map(SubtitleBlock::as_str)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    /// Short excerpt for progress messages
    ///
    /// Uses the second non-empty line of the chunk (the timestamp line of the
    /// first block in a well-formed file), falling back to the first.
    pub fn preview(&self) -> String {
        let text = self.to_text();
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = lines.next();
        let second = lines.next();
        second
            .or(first)
            .unwrap_or("")
            .chars()
            .take(PREVIEW_MAX_CHARS)
            .collect()
    }
}

// @struct: Blocks read from one subtitle file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    // @field: Source file path
    pub source_file: PathBuf,

    // @field: Blocks in file order
    pub blocks: Vec<SubtitleBlock>,
}

impl SubtitleCollection {
    // @creates: Collection by splitting raw file content
    pub fn from_content(source_file: PathBuf, content: &str) -> Self {
        let blocks = Self::parse_blocks(content);
        debug!("Parsed {} block(s) from {:?}", blocks.len(), source_file);
        Self { source_file, blocks }
    }

    /// Split raw subtitle content into trimmed, non-empty blocks
    ///
    /// A boundary is any run of two or more line terminators. Content without
    /// such a run yields a single block equal to the trimmed input.
    pub fn parse_blocks(content: &str) -> Vec<SubtitleBlock> {
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
        BLOCK_SEPARATOR_REGEX
            .split(content)
            .filter_map(SubtitleBlock::new)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // @returns: Chunks of at least `min_blocks` blocks each
    pub fn split_into_chunks(&self, min_blocks: usize) -> Vec<SubtitleChunk> {
        build_chunks(&self.blocks, min_blocks)
    }
}

/// Partition blocks into contiguous chunks of `min_blocks`
///
/// A trailing run shorter than `min_blocks` is merged into the chunk before
/// it, so every chunk meets the minimum unless the whole input is smaller
/// than one chunk. Chunks are numbered from 1.
pub fn build_chunks(blocks: &[SubtitleBlock], min_blocks: usize) -> Vec<SubtitleChunk> {
    if blocks.is_empty() {
        warn!("No subtitle blocks to split into chunks");
        return Vec::new();
    }

    let size = min_blocks.max(1);
    let mut runs: Vec<Vec<SubtitleBlock>> = blocks.chunks(size).map(<[SubtitleBlock]>::to_vec).collect();

    if runs.len() > 1 && runs.last().is_some_and(|last| last.len() < size) {
        if let Some(last) = runs.pop() {
            if let Some(previous) = runs.last_mut() {
                previous.extend(last);
            }
        }
    }

    runs.into_iter()
        .enumerate()
        .map(|(i, blocks)| SubtitleChunk { index: i + 1, blocks })
        .collect()
}
