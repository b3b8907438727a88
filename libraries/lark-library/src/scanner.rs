//! Filesystem track scanner
//!
//! Walks the configured roots for audio files and reads title and artist tags
//! with lofty. Track ids are derived from the canonical file path, so they
//! stay stable across rescans as long as the file does not move.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use lark_core::traits::TrackScanner;
use lark_core::types::{RawTrack, TrackId};
use lofty::{Accessor, Probe, TaggedFileExt};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default audio file extensions
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"];

/// Artist shown when a file carries no artist tag
pub const UNKNOWN_ARTIST: &str = "<unknown>";

/// Hex characters kept from the path digest
const ID_LENGTH: usize = 16;

/// Scanner for audio files under a set of root directories
#[derive(Debug, Clone)]
pub struct FileSystemScanner {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    follow_links: bool,
}

impl Default for FileSystemScanner {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            follow_links: false,
        }
    }
}

impl FileSystemScanner {
    /// Create a scanner over `roots` with the default extensions
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Replace the accepted extensions (case-insensitive, without the dot)
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Configured scan roots
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Whether `path` has one of the accepted extensions
    pub fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            })
    }

    /// Find audio files below one directory
    pub fn scan_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(ScanError::RootNotFound(path.display().to_string()));
        }

        if !path.is_dir() {
            return Err(ScanError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let mut audio_files = Vec::new();
        let walker = WalkDir::new(path).follow_links(self.follow_links);

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();

            if entry.file_type().is_dir() {
                continue;
            }

            if self.is_audio_file(path) {
                audio_files.push(path.to_path_buf());
            }
        }

        Ok(audio_files)
    }

    /// Scan every root and read the tracks, sorted by title
    ///
    /// Files are identified by their canonical path, so a file reachable from
    /// overlapping roots (or through differently spelled roots) is listed once
    /// under one id. Roots that are missing or unreadable are logged and
    /// skipped. Blocking; the async entry point runs this on the blocking pool.
    pub fn scan_blocking(&self) -> Vec<RawTrack> {
        let mut tracks = Vec::new();
        let mut seen = HashSet::new();

        for root in &self.roots {
            match self.scan_directory(root) {
                Ok(files) => {
                    tracing::debug!("Found {} audio files under {}", files.len(), root.display());
                    for file in files {
                        let file = fs::canonicalize(&file).unwrap_or(file);
                        if seen.insert(file.clone()) {
                            tracks.push(read_track(&file));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to scan {}: {}", root.display(), e);
                }
            }
        }

        // Stable, so tracks with equal titles keep walk order
        tracks.sort_by_cached_key(|track| track.title.to_lowercase());
        tracks
    }
}

#[async_trait]
impl TrackScanner for FileSystemScanner {
    async fn scan_and_list(&self) -> lark_core::Result<Vec<RawTrack>> {
        let scanner = self.clone();
        let tracks = tokio::task::spawn_blocking(move || scanner.scan_blocking())
            .await
            .map_err(|e| ScanError::Interrupted(e.to_string()))?;

        tracing::info!("Scanned {} tracks", tracks.len());
        Ok(tracks)
    }
}

/// Stable id for a file path
pub fn track_id_for_path(path: &Path) -> TrackId {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let digest = hex::encode(hasher.finalize());
    TrackId::new(&digest[..ID_LENGTH])
}

/// Tag values read from a file
#[derive(Debug, Default)]
struct TagFields {
    title: Option<String>,
    artist: Option<String>,
}

fn read_tags(path: &Path) -> Result<TagFields> {
    let tagged_file = Probe::open(path)
        .map_err(|e| ScanError::Metadata(format!("Failed to open file: {}", e)))?
        .read()
        .map_err(|e| ScanError::Metadata(format!("Failed to read file: {}", e)))?;

    let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) else {
        return Ok(TagFields::default());
    };

    let non_blank = |s: std::borrow::Cow<'_, str>| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    Ok(TagFields {
        title: tag.title().and_then(non_blank),
        artist: tag.artist().and_then(non_blank),
    })
}

/// Build a track record for one file
///
/// Files whose tags cannot be read are still listed: the title falls back to
/// the file stem and the artist to [`UNKNOWN_ARTIST`].
pub fn read_track(path: &Path) -> RawTrack {
    let tags = read_tags(path).unwrap_or_else(|e| {
        tracing::debug!("No readable tags in {}: {}", path.display(), e);
        TagFields::default()
    });

    let title = tags.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let artist = tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    RawTrack::new(
        track_id_for_path(path),
        title,
        artist,
        path.to_string_lossy().into_owned(),
    )
}
