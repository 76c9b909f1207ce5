use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::error::ImportError;
use super::session::ImportSession;

/// In-memory хранилище активных сессий импорта.
///
/// Состояние живёт только в памяти процесса: завершённая или
/// отменённая сессия удаляется, рестарт сервера теряет незакрытые
/// сессии.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, ImportSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: ImportSession) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id.clone(), session);
    }

    /// Прочитать сессию под read-блокировкой
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&ImportSession) -> R,
    ) -> Result<R, ImportError> {
        let sessions = self.sessions.read().unwrap();
        let session = sessions
            .get(id)
            .ok_or_else(|| ImportError::SessionNotFound(id.to_string()))?;
        Ok(f(session))
    }

    /// Изменить сессию под write-блокировкой.
    ///
    /// Блокировка не переживает await — вся асинхронщина снаружи.
    pub fn with_session_mut<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut ImportSession) -> R,
    ) -> Result<R, ImportError> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ImportError::SessionNotFound(id.to_string()))?;
        Ok(f(session))
    }

    pub fn remove(&self, id: &str) -> Result<ImportSession, ImportError> {
        let mut sessions = self.sessions.write().unwrap();
        sessions
            .remove(id)
            .ok_or_else(|| ImportError::SessionNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> ImportSession {
        ImportSession::new(id.to_string(), Vec::new(), Default::default())
    }

    #[test]
    fn missing_session_is_an_error() {
        let store = SessionStore::new();
        let result = store.with_session("nope", |s| s.cursor);
        assert!(matches!(result, Err(ImportError::SessionNotFound(_))));
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.insert(session("a"));
        store.insert(session("b"));

        store.with_session_mut("a", |s| s.skipped = 5).unwrap();

        assert_eq!(store.with_session("a", |s| s.skipped).unwrap(), 5);
        assert_eq!(store.with_session("b", |s| s.skipped).unwrap(), 0);
    }

    #[test]
    fn remove_returns_the_session() {
        let store = SessionStore::new();
        store.insert(session("a"));

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(store.is_empty());
        assert!(store.remove("a").is_err());
    }
}
