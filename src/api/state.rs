use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    config::FetchSettings,
    error::{AppError, AppResult},
    services::{providers::MetadataSource, RandomPicker, Session, TitlePicker},
};

/// Shared application state
///
/// Each session sits behind its own mutex, so actions on one session run one at a
/// time while different sessions proceed independently.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
    pub source: Arc<dyn MetadataSource>,
    pub settings: FetchSettings,
    pub picker: Arc<Mutex<Box<dyn TitlePicker>>>,
}

impl AppState {
    /// Creates state with no sessions and an entropy-seeded picker
    pub fn new(source: Arc<dyn MetadataSource>, settings: FetchSettings) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            source,
            settings,
            picker: Arc::new(Mutex::new(Box::new(RandomPicker::new()))),
        }
    }

    /// Replaces the random source used for "surprise me"
    pub fn with_picker(mut self, picker: impl TitlePicker + 'static) -> Self {
        self.picker = Arc::new(Mutex::new(Box::new(picker)));
        self
    }

    pub async fn create_session(&self) -> Uuid {
        let session = Session::new();
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));

        tracing::info!(session_id = %id, "Session created");
        id
    }

    pub async fn session(&self, id: Uuid) -> AppResult<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }

    pub async fn end_session(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| tracing::info!(session_id = %id, "Session ended"))
            .ok_or(AppError::SessionNotFound(id))
    }
}
