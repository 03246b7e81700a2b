use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use spt_core::PresetFormat;
use spt_logging::spt_info;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preset directory missing or not writable: {0}")]
    PresetDir(String),
    #[error("invalid preset name {0:?}")]
    InvalidName(String),
    #[error("no preset named {0:?}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the preset directory exists; create if missing.
pub fn ensure_preset_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::PresetDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::PresetDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::PresetDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, StoreError> {
        ensure_preset_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(target)
    }
}

/// Named presets stored as `<name>.ron` or `<name>.json` files in one directory.
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save(
        &self,
        name: &str,
        format: PresetFormat,
        contents: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let stem = preset_stem(name)?;
        let path = AtomicFileWriter::new(self.dir.clone()).write(&file_name(&stem, format), contents)?;
        // A name maps to one file; the copy in the other format goes only
        // once the new one is in place.
        for other in [PresetFormat::Ron, PresetFormat::Json] {
            if other != format {
                let stale = self.dir.join(file_name(&stem, other));
                if stale.is_file() {
                    fs::remove_file(&stale)?;
                }
            }
        }
        spt_info!("Saved preset {:?} to {:?}", name, path);
        Ok(path)
    }

    /// Reads a preset by name, returning its bytes and the format implied by
    /// its extension.
    pub fn load(&self, name: &str) -> Result<(Vec<u8>, PresetFormat), StoreError> {
        let stem = preset_stem(name)?;
        for format in [PresetFormat::Ron, PresetFormat::Json] {
            let path = self.dir.join(file_name(&stem, format));
            match fs::read(&path) {
                Ok(bytes) => return Ok((bytes, format)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(StoreError::NotFound(name.to_string()))
    }

    /// Preset names in the directory, sorted. A missing directory has none.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_preset = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(PresetFormat::from_extension)
                .is_some();
            if !is_preset || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }
}

fn file_name(stem: &str, format: PresetFormat) -> String {
    format!("{stem}.{}", format.extension())
}

/// Filesystem-safe stem for a preset name.
fn preset_stem(name: &str) -> Result<String, StoreError> {
    let mut cleaned = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.trim().chars() {
        let c = if is_forbidden(c) || c.is_whitespace() { '_' } else { c };
        if c == '_' {
            if !prev_underscore {
                cleaned.push(c);
            }
            prev_underscore = true;
        } else {
            cleaned.push(c);
            prev_underscore = false;
        }
    }
    let cleaned = cleaned.trim_matches(&['_', '.'][..]).to_string();
    if cleaned.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(cleaned.chars().take(64).collect())
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
