use std::path::PathBuf;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::{DocumentSession, Result, SessionError, SessionSummary};

/// Owns every live session and arbitrates the identifier-to-session
/// mapping. Each document is exclusively owned by exactly one session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: IndexMap<String, DocumentSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Load the file at `path` into a new session. A supplied identifier
    /// must not collide with a live session; without one a fresh
    /// identifier is generated.
    pub fn open(&mut self, path: impl Into<PathBuf>, id: Option<String>) -> Result<&mut DocumentSession> {
        let id = self.claim_id(id)?;
        let session = DocumentSession::open(id.clone(), path)?;
        log::info!("opened session `{id}` from {}", session.path().display());
        Ok(self.register(id, session))
    }

    /// Build an empty document bound to `path` and register a session for
    /// it. Does not write to storage; the session starts dirty.
    pub fn create(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        id: Option<String>,
    ) -> Result<&mut DocumentSession> {
        let id = self.claim_id(id)?;
        let session = DocumentSession::create(id.clone(), path, name);
        log::info!("created session `{id}` at {}", session.path().display());
        Ok(self.register(id, session))
    }

    pub fn get(&self, id: &str) -> Result<&DocumentSession> {
        self.sessions
            .get(id)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut DocumentSession> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))
    }

    /// Close a session, saving first when asked and dirty. The session is
    /// released even if that save fails; returns false when the
    /// identifier was never registered.
    pub fn close(&mut self, id: &str, save: bool) -> Result<bool> {
        let Some(mut session) = self.sessions.shift_remove(id) else {
            return Ok(false);
        };
        if save && session.is_dirty() {
            session.save(None)?;
        }
        log::info!("closed session `{id}`");
        Ok(true)
    }

    /// Close every live session. One session's save failure is logged and
    /// does not stop the rest from closing; the failures come back paired
    /// with their session identifiers.
    pub fn close_all(&mut self, save: bool) -> Vec<(String, SessionError)> {
        let mut failures = Vec::new();
        for (id, mut session) in std::mem::take(&mut self.sessions) {
            if save && session.is_dirty() {
                if let Err(err) = session.save(None) {
                    log::warn!("failed to save session `{id}` while closing: {err}");
                    failures.push((id, err));
                    continue;
                }
            }
            log::info!("closed session `{id}`");
        }
        failures
    }

    /// Snapshot every live session; no mutation.
    pub fn list(&self) -> Vec<SessionSummary> {
        self.sessions.values().map(DocumentSession::summary).collect()
    }

    fn register(&mut self, id: String, session: DocumentSession) -> &mut DocumentSession {
        // claim_id already rejected collisions
        let (index, previous) = self.sessions.insert_full(id, session);
        debug_assert!(previous.is_none(), "registered a session under a live identifier");
        &mut self.sessions[index]
    }

    fn claim_id(&self, requested: Option<String>) -> Result<String> {
        match requested {
            Some(id) => {
                if self.sessions.contains_key(&id) {
                    Err(SessionError::SessionConflict(id))
                } else {
                    Ok(id)
                }
            }
            None => Ok(Uuid::new_v4().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn create_then_close_without_save_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut registry = SessionRegistry::new();
        let id = registry
            .create(&path, "My Game", Some("s1".to_string()))
            .unwrap()
            .id()
            .to_string();

        assert!(registry.close(&id, false).unwrap());
        assert!(!path.exists());
        // a second close of the same id is a no-op
        assert!(!registry.close(&id, false).unwrap());
    }

    #[test]
    fn close_with_save_persists_dirty_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut registry = SessionRegistry::new();
        registry
            .create(&path, "My Game", Some("s1".to_string()))
            .unwrap();

        assert!(registry.close("s1", true).unwrap());
        assert!(path.exists());

        // reopen and verify the document survived
        let session = registry.open(&path, None).unwrap();
        assert_eq!(session.project().name, "My Game");
    }

    #[test]
    fn supplied_identifier_conflicts_are_rejected() {
        let dir = tempdir().unwrap();
        let mut registry = SessionRegistry::new();
        registry
            .create(dir.path().join("a.json"), "A", Some("same".to_string()))
            .unwrap();
        let err = registry
            .create(dir.path().join("b.json"), "B", Some("same".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::SessionConflict(id) if id == "same"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn generated_identifiers_are_fresh() {
        let dir = tempdir().unwrap();
        let mut registry = SessionRegistry::new();
        let a = registry
            .create(dir.path().join("a.json"), "A", None)
            .unwrap()
            .id()
            .to_string();
        let b = registry
            .create(dir.path().join("b.json"), "B", None)
            .unwrap()
            .id()
            .to_string();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn get_reports_missing_sessions() {
        let registry = SessionRegistry::new();
        let err = registry.get("nope").unwrap_err();
        assert!(matches!(err, SessionError::SessionNotFound(id) if id == "nope"));
    }

    #[test]
    fn list_snapshots_every_live_session() {
        let dir = tempdir().unwrap();
        let mut registry = SessionRegistry::new();
        registry
            .create(dir.path().join("a.json"), "A", Some("s1".to_string()))
            .unwrap();
        registry
            .create(dir.path().join("b.json"), "B", Some("s2".to_string()))
            .unwrap();

        let summaries = registry.list();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.dirty));
        let names: Vec<&str> = summaries.iter().map(|s| s.project_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn close_all_saves_dirty_and_empties_the_registry() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        let mut registry = SessionRegistry::new();
        registry.create(&a, "A", Some("s1".to_string())).unwrap();
        registry.create(&b, "B", Some("s2".to_string())).unwrap();

        let failures = registry.close_all(true);
        assert!(failures.is_empty());
        assert!(registry.is_empty());
        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn close_all_keeps_going_past_a_failing_save() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.json");
        // a path whose parent is a regular file cannot be created
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let bad = blocker.join("sub").join("bad.json");

        let mut registry = SessionRegistry::new();
        registry.create(&bad, "Bad", Some("s1".to_string())).unwrap();
        registry.create(&good, "Good", Some("s2".to_string())).unwrap();

        let failures = registry.close_all(true);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "s1");
        assert!(registry.is_empty());
        assert!(good.exists());
    }
}
