use crate::domain::model::Archive;
use crate::utils::error::{Result, ZenodoError};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Path components that are never archived.
pub const DEFAULT_IGNORE: &[&str] = &[
    ".git",
    ".venv",
    ".mypy_cache",
    ".ruff_cache",
    ".pytest_cache",
    ".DS_Store",
    "__pycache__",
    "build",
    "dist",
    "htmlcov",
];

/// File suffixes that are never archived.
pub const ALWAYS_IGNORE_SUFFIXES: &[&str] = &[".pyc", ".pyo"];

#[derive(Debug, Clone)]
pub struct Archiver {
    ignore_names: HashSet<String>,
    skip_paths: Vec<PathBuf>,
}

impl Default for Archiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver {
    pub fn new() -> Self {
        Self {
            ignore_names: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            skip_paths: Vec::new(),
        }
    }

    /// Adds names to the exclusion list on top of [`DEFAULT_IGNORE`].
    pub fn with_ignored<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Never archive this exact file, e.g. a saved copy of the archive inside the tree.
    pub fn skipping_path(mut self, path: &Path) -> Self {
        self.skip_paths.push(normalize(path));
        self
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        let name_hit = relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|part| self.ignore_names.contains(part))
                .unwrap_or(false)
        });
        if name_hit {
            return true;
        }

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        ALWAYS_IGNORE_SUFFIXES
            .iter()
            .any(|suffix| file_name.ends_with(suffix))
    }

    pub fn zip_directory(&self, directory: &Path) -> Result<Archive> {
        let root = directory
            .canonicalize()
            .map_err(|_| ZenodoError::NotADirectory {
                path: directory.display().to_string(),
            })?;
        if !root.is_dir() {
            return Err(ZenodoError::NotADirectory {
                path: directory.display().to_string(),
            });
        }

        let file_name = archive_file_name(&root);
        let mut files = Vec::new();
        self.collect_files(&root, &root, &mut files)?;
        files.sort();

        tracing::info!(
            "Creating archive {} from {} ({} files)",
            file_name,
            root.display(),
            files.len()
        );

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        let mut entries = Vec::with_capacity(files.len());
        let bytes = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            for relative in &files {
                let entry_name = entry_name(relative);
                tracing::debug!("Adding {}", entry_name);

                zip.start_file(entry_name.as_str(), options)?;
                let content = fs::read(root.join(relative))?;
                zip.write_all(&content)?;
                entries.push(entry_name);
            }

            zip.finish()?.into_inner()
        };

        tracing::info!("Archive {} created ({} bytes)", file_name, bytes.len());

        Ok(Archive {
            file_name,
            bytes,
            entries,
        })
    }

    fn collect_files(&self, root: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let relative = match path.strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };

            if self.is_ignored(&relative) {
                tracing::debug!("Skipping ignored path {}", relative.display());
                continue;
            }

            // file_type() does not follow symlinks
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.collect_files(root, &path, files)?;
                continue;
            }

            // Links to files are archived with the target's contents; linked directories are not walked.
            let is_file = if file_type.is_symlink() {
                match fs::metadata(&path) {
                    Ok(target) if target.is_file() => true,
                    Ok(_) => {
                        tracing::debug!("Skipping symlinked directory {}", relative.display());
                        false
                    }
                    Err(e) => {
                        tracing::debug!("Skipping dangling symlink {}: {}", relative.display(), e);
                        false
                    }
                }
            } else {
                file_type.is_file()
            };

            if !is_file {
                continue;
            }
            if self.skip_paths.iter().any(|skip| *skip == path) {
                tracing::debug!("Skipping {}", path.display());
                continue;
            }
            files.push(relative);
        }
        Ok(())
    }
}

impl Archive {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &self.bytes)?;
        tracing::info!("Archive saved to {}", path.display());
        Ok(())
    }
}

fn archive_file_name(root: &Path) -> String {
    match root.file_name().map(|n| n.to_string_lossy().to_string()) {
        Some(name) if !name.is_empty() => format!("{}.zip", name),
        _ => "archive.zip".to_string(),
    }
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// Resolve what can be resolved; the file itself may not exist yet.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}
