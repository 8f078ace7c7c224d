//! File discovery for finding plant images in the configured folder.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

/// Discovers image files in a single directory (no recursion).
pub struct FileDiscovery {
    formats: Vec<String>,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a new file discovery instance for the given extensions.
    pub fn new(supported_formats: &[String]) -> Self {
        Self {
            formats: supported_formats.to_vec(),
        }
    }

    /// Discover all supported image files directly inside `folder`.
    ///
    /// Subdirectories are not entered. Results are sorted lexicographically by
    /// path so a batch is reproducible across runs.
    ///
    /// A nonexistent folder or a folder with no matching files is an error;
    /// the caller aborts the run before any model call or submission.
    pub fn discover(&self, folder: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        if !folder.is_dir() {
            return Err(PipelineError::FolderNotFound(folder.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(folder)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry_path.is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        if files.is_empty() {
            return Err(PipelineError::NoImages(folder.to_path_buf()));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.formats.iter().any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}
