//! Markdown splitter
//!
//! Post-processing for already written documents: every markdown file is cut into chunks
//! at heading lines, and each chunk is written as its own file.
//!
//! Chunk files are named `{stem}_{index:03}_{slug}.md` and start with a `Source: {stem}`
//! line followed by the heading line, so chunks stay traceable to their file.

use crate::output::DocumentWriter;
use crate::CrawlError;
use jwalk::{Parallelism, WalkDir};
use std::path::{Path, PathBuf};

/// Deepest markdown heading level
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Slug of a chunk without a heading
const UNNAMED_CHUNK: &str = "chunk";

/// A run of lines starting at a heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The heading line as written (including the `#` marks), if any
    pub heading: Option<String>,

    /// Heading level 1-6, 0 for text before the first heading
    pub level: u8,

    /// Lines between this heading and the next split point
    pub content: String,
}

/// Returns the level of a markdown heading line (`#` to `######` followed by whitespace)
pub fn heading_level(line: &str) -> Option<u8> {
    let marks = line.len() - line.trim_start_matches('#').len();
    if marks == 0 || marks > MAX_HEADING_LEVEL as usize {
        return None;
    }

    line[marks..]
        .chars()
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| marks as u8)
}

/// Splits markdown content into chunks at heading lines
///
/// With `max_level` set, only headings up to that level start a new chunk; deeper headings
/// stay inside the current chunk. Text before the first heading becomes a chunk without a
/// heading unless it is blank.
pub fn split_by_headings(content: &str, max_level: Option<u8>) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut heading: Option<String> = None;
    let mut level = 0;
    let mut lines: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        match heading_level(line) {
            Some(found) if max_level.map_or(true, |max| found <= max) => {
                push_chunk(&mut chunks, heading.take(), level, &lines);
                heading = Some(line.to_string());
                level = found;
                lines.clear();
            }
            _ => lines.push(line),
        }
    }
    push_chunk(&mut chunks, heading, level, &lines);

    chunks
}

fn push_chunk(chunks: &mut Vec<Chunk>, heading: Option<String>, level: u8, lines: &[&str]) {
    let content = lines.join("\n");
    if heading.is_none() && content.trim().is_empty() {
        return;
    }
    chunks.push(Chunk {
        heading,
        level,
        content,
    });
}

/// File-name slug of a heading line
///
/// The `#` marks are dropped, characters other than word characters, whitespace and `-` are
/// removed, the rest is lowercased and runs of whitespace or `-` become a single `-`.
pub fn heading_slug(heading: &str) -> String {
    let text = heading.trim_start_matches('#').trim();
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase();

    let mut slug = String::with_capacity(kept.len());
    let mut in_run = false;
    for c in kept.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_run {
                slug.push('-');
                in_run = true;
            }
        } else {
            slug.push(c);
            in_run = false;
        }
    }
    slug
}

/// File name of the `index`-th chunk of the file with stem `stem`
pub fn chunk_file_name(stem: &str, index: usize, chunk: &Chunk) -> String {
    let slug = chunk
        .heading
        .as_deref()
        .map(heading_slug)
        .unwrap_or_else(|| UNNAMED_CHUNK.to_string());
    format!("{}_{:03}_{}.md", stem, index, slug)
}

/// File content of a chunk
pub fn render_chunk(stem: &str, chunk: &Chunk) -> String {
    match &chunk.heading {
        Some(heading) => format!("Source: {}\n\n{}\n\n{}", stem, heading, chunk.content),
        None => format!("Source: {}\n\n{}", stem, chunk.content),
    }
}

/// Writes every chunk of one source file
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the written chunk files
/// * `Err(CrawlError::Write)` - A chunk could not be written
pub fn save_chunks(
    chunks: &[Chunk],
    writer: &dyn DocumentWriter,
    stem: &str,
) -> Result<Vec<PathBuf>, CrawlError> {
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| -> Result<PathBuf, CrawlError> {
            let path = writer.write(&chunk_file_name(stem, index, chunk), &render_chunk(stem, chunk))?;
            tracing::debug!("Saved chunk to {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Splits one markdown file and writes its chunks
///
/// # Returns
///
/// * `Ok(usize)` - Number of chunks written
/// * `Err(CrawlError)` - The file could not be read or a chunk could not be written
pub fn process_markdown_file(
    file: &Path,
    writer: &dyn DocumentWriter,
    max_level: Option<u8>,
) -> Result<usize, CrawlError> {
    let content = std::fs::read_to_string(file)?;
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let chunks = split_by_headings(&content, max_level);
    save_chunks(&chunks, writer, &stem)?;

    tracing::info!("Split {} into {} chunks", file.display(), chunks.len());
    Ok(chunks.len())
}

/// Finds `.md` files (extension matched case-insensitively) in `dir`, sorted by path
///
/// Symbolic links are listed but never descended into, so a link back to an ancestor
/// cannot make the walk revisit the tree. Entries that cannot be read are logged and
/// skipped; only an unreadable `dir` itself is an error.
pub fn find_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, CrawlError> {
    std::fs::read_dir(dir)?;

    let mut walker = WalkDir::new(dir)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };

        let file_type = entry.file_type();
        let path = entry.path();
        // a link to a file counts as that file
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && is_markdown_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_markdown_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.to_lowercase().ends_with(".md"))
}

/// Outcome of splitting a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Files split successfully
    pub files_processed: usize,
    /// Files that could not be split
    pub files_failed: usize,
    /// Chunks written in total
    pub chunks_written: usize,
}

/// Splits every markdown file found in `input_dir`
///
/// A file that fails is logged and skipped.
pub fn split_directory(
    input_dir: &Path,
    writer: &dyn DocumentWriter,
    max_level: Option<u8>,
    recursive: bool,
) -> Result<SplitSummary, CrawlError> {
    let files = find_markdown_files(input_dir, recursive)?;
    tracing::info!("Found {} markdown files to process", files.len());

    let mut summary = SplitSummary::default();
    for file in &files {
        match process_markdown_file(file, writer, max_level) {
            Ok(count) => {
                summary.files_processed += 1;
                summary.chunks_written += count;
            }
            Err(e) => {
                tracing::warn!("Error processing {}: {}", file.display(), e);
                summary.files_failed += 1;
            }
        }
    }

    Ok(summary)
}
