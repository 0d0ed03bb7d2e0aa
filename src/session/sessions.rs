// src/session/sessions.rs
use crate::domain::ResultStore;
use crate::errors::ServerError;
use crate::geocode::MapMarker;
use crate::search::SearchError;
use crate::session::token::{generate_token_default, hash_token};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Everything one browser session owns. Handlers get it by reference;
/// there is no state shared between sessions.
#[derive(Debug)]
pub struct Session {
    pub results: ResultStore,
    /// City of the last search; empty before the first one.
    pub city: String,
    /// User-visible message from the last search (failure or no results).
    pub notice: Option<String>,
    /// Markers geocoded for the batch with this generation.
    pub markers: Option<(u64, Vec<MapMarker>)>,
    last_seen: i64,
}

impl Session {
    fn new(now: i64) -> Self {
        Self {
            results: ResultStore::new(),
            city: String::new(),
            notice: None,
            markers: None,
            last_seen: now,
        }
    }

    /// Applies the outcome of a search to the session.
    ///
    /// - results: the batch is replaced wholesale
    /// - no results: the store is emptied
    /// - transport failure: the store is emptied, unless `preserve_on_failure`
    ///   is set, in which case the last good batch stays
    pub fn apply_search(
        &mut self,
        city: &str,
        outcome: Result<Vec<Value>, SearchError>,
        preserve_on_failure: bool,
    ) {
        match outcome {
            Ok(raw) if raw.is_empty() => {
                self.results.clear();
                self.city = city.to_string();
                self.notice = Some("No se encontraron propiedades.".to_string());
            }
            Ok(raw) => {
                self.results.ingest(&raw);
                self.city = city.to_string();
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!(city, error = %e, "search failed, treating batch as empty");
                if !preserve_on_failure {
                    self.results.clear();
                    self.city = city.to_string();
                }
                self.notice = Some(format!("Error al obtener datos de búsqueda: {e}"));
            }
        }
    }
}

pub struct SessionRegistry {
    sessions: Mutex<HashMap<[u8; 32], Session>>,
    ttl_secs: i64,
}

impl SessionRegistry {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl_secs,
        }
    }

    /// Refreshes the session behind `raw_token` and returns the token.
    /// `None` when the cookie is missing, unknown or expired.
    pub fn touch(&self, raw_token: Option<&str>, now: i64) -> Result<Option<String>, ServerError> {
        let mut sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;

        let ttl = self.ttl_secs;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen <= ttl);
        if sessions.len() < before {
            tracing::debug!(purged = before - sessions.len(), "expired sessions purged");
        }

        let Some(token) = raw_token else {
            return Ok(None);
        };

        Ok(sessions.get_mut(&hash_token(token)).map(|session| {
            session.last_seen = now;
            token.to_string()
        }))
    }

    /// Starts a new session and returns its raw token.
    pub fn open(&self, now: i64) -> Result<String, ServerError> {
        let mut sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;

        let token = generate_token_default();
        sessions.insert(hash_token(&token), Session::new(now));
        tracing::debug!(active = sessions.len(), "session created");

        Ok(token)
    }

    /// Runs `f` against the caller's session, or against a blank one when
    /// there is none. Nothing is stored for callers without a session.
    pub fn view<F, T>(&self, raw_token: Option<&str>, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Session) -> T,
    {
        let sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;
        match raw_token.and_then(|token| sessions.get(&hash_token(token))) {
            Some(session) => Ok(f(session)),
            None => Ok(f(&Session::new(0))),
        }
    }

    /// Runs `f` against the session for `raw_token`.
    pub fn with_session<F, T>(&self, raw_token: &str, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Session) -> Result<T, ServerError>,
    {
        let mut sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;
        let session = sessions
            .get_mut(&hash_token(raw_token))
            .ok_or_else(session_expired)?;
        f(session)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

pub fn session_expired() -> ServerError {
    ServerError::Conflict("La sesión expiró; recargue la página.".into())
}
