use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use lienzo_project::Project;

use crate::{Result, SessionError};

/// A live binding between one project document, a file path, and a
/// caller-visible identifier. Owns the document exclusively for its
/// lifetime and tracks unsaved changes.
#[derive(Debug)]
pub struct DocumentSession {
    id: String,
    path: PathBuf,
    project: Project,
    dirty: bool,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

/// Plain serializable snapshot of a session for listing.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub path: PathBuf,
    pub project_name: String,
    pub dirty: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl DocumentSession {
    /// Load an existing project file from disk. The session starts clean.
    pub fn open(id: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path)?;
        let project: Project = serde_json::from_slice(&bytes)?;
        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            path,
            project,
            dirty: false,
            created_at: now,
            modified_at: now,
        })
    }

    /// Build an empty in-memory document bound to `path`. Nothing is
    /// written to disk; the session starts dirty.
    pub fn create(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            path: path.into(),
            project: Project::new(name),
            dirty: true,
            created_at: now,
            modified_at: now,
        }
    }

    // ======================================================
    // ===================== Accessors ======================
    // ======================================================

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Read-only view of the wrapped document.
    #[inline]
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            path: self.path.clone(),
            project_name: self.project.name.clone(),
            dirty: self.dirty,
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    // ======================================================
    // ===================== Mutation =======================
    // ======================================================

    /// Run one mutation against the document. On success the session is
    /// marked dirty and its last-modified timestamp advances; a failed
    /// precondition check leaves both untouched. Storage is never touched
    /// here; persistence is an explicit, separate call.
    pub fn mutate<R>(
        &mut self,
        f: impl FnOnce(&mut Project) -> lienzo_project::Result<R>,
    ) -> Result<R> {
        let out = f(&mut self.project)?;
        self.dirty = true;
        self.modified_at = Utc::now();
        Ok(out)
    }

    // ======================================================
    // ==================== Persistence =====================
    // ======================================================

    /// Serialize the document and write it to the session's path (or to
    /// `new_path`, which becomes the session's path on success). The file
    /// is replaced atomically via a sibling temp file; the dirty flag is
    /// cleared only on success.
    pub fn save(&mut self, new_path: Option<PathBuf>) -> Result<()> {
        let target = new_path.unwrap_or_else(|| self.path.clone());
        let data = serde_json::to_vec_pretty(&self.project)?;
        write_replacing(&target, &data)?;
        self.path = target;
        self.dirty = false;
        self.modified_at = Utc::now();
        log::info!("saved session `{}` to {}", self.id, self.path.display());
        Ok(())
    }

    /// Copy the current on-disk file (not the in-memory state) to a
    /// sibling path tagged with the current timestamp. Fails when no file
    /// exists yet, e.g. for an unsaved created project.
    pub fn backup(&self) -> Result<PathBuf> {
        if !self.path.exists() {
            return Err(SessionError::NothingToBackUp(self.path.clone()));
        }
        let backup_path = backup_path_for(&self.path, Utc::now());
        fs::copy(&self.path, &backup_path)?;
        Ok(backup_path)
    }
}

/// Write via temp file + rename so the authoritative file is never left
/// truncated by a crash mid-write.
fn write_replacing(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}

/// `game.json` becomes `game.backup-20260829-153000.json` next to it.
fn backup_path_for(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    let tag = now.format("%Y%m%d-%H%M%S");
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}.backup-{tag}.{}", ext.to_string_lossy()),
        None => format!("{stem}.backup-{tag}"),
    };
    path.with_file_name(file_name)
}
