//! Fetch, clean, select and delete orchestration over a single [`AppState`].
//!
//! Every operation catches its own failures and records them in
//! `AppState::error`; none of them return an error to the caller.

use std::sync::Arc;

use shared::domain::{Folder, FolderId, Palette};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::{
    api::PaletteApi,
    cleaners::{DataCleaner, StandardCleaner},
    error::{AppError, ClientError, ErrorKind},
    state::{reduce, AppState, StateEvent},
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged(AppState),
    RefreshDiscarded { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Folders were replaced with the fetched data.
    Applied,
    /// The failure was recorded in `error`.
    Failed,
    /// A newer refresh settled first; nothing was written.
    Stale,
}

pub struct AppController {
    api: Arc<dyn PaletteApi>,
    cleaner: Arc<dyn DataCleaner>,
    state: RwLock<AppState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl AppController {
    pub fn new(api: Arc<dyn PaletteApi>) -> Self {
        Self::with_cleaner(api, Arc::new(StandardCleaner))
    }

    pub fn with_cleaner(api: Arc<dyn PaletteApi>, cleaner: Arc<dyn DataCleaner>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            cleaner,
            state: RwLock::new(AppState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn folders(&self) -> Vec<Folder> {
        self.state.read().await.folders.clone()
    }

    pub async fn current_folder(&self) -> Option<Folder> {
        self.state.read().await.current_folder.clone()
    }

    pub async fn current_palette(&self) -> Option<Palette> {
        self.state.read().await.current_palette.clone()
    }

    pub async fn error(&self) -> Option<AppError> {
        self.state.read().await.error.clone()
    }

    pub async fn on_mount(&self) -> RefreshOutcome {
        info!("mounting palette controller");
        self.refresh().await
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = self.dispatch(StateEvent::RefreshStarted).await.refresh_issued;

        let event = match self.load_folders().await {
            Ok(folders) => {
                info!(generation, folders = folders.len(), "refresh fetched folders");
                StateEvent::RefreshSucceeded {
                    generation,
                    folders,
                }
            }
            Err(err) => {
                warn!(generation, error = %err, "refresh failed");
                StateEvent::RefreshFailed {
                    generation,
                    error: AppError::from_client(ErrorKind::Fetch, &err),
                }
            }
        };
        let failed = matches!(event, StateEvent::RefreshFailed { .. });

        let state = self.dispatch(event).await;
        if state.refresh_applied != generation {
            debug!(
                generation,
                applied = state.refresh_applied,
                "discarding stale refresh result"
            );
            let _ = self
                .events
                .send(ControllerEvent::RefreshDiscarded { generation });
            return RefreshOutcome::Stale;
        }

        if failed {
            RefreshOutcome::Failed
        } else {
            RefreshOutcome::Applied
        }
    }

    /// Returns `false` when no folder with `id` is loaded; the current
    /// selection is then left as it was.
    pub async fn select_folder(&self, id: FolderId) -> bool {
        let state = self.dispatch(StateEvent::FolderSelected(id)).await;
        let found = state.folder(id).is_some();
        if !found {
            warn!(folder_id = id.0, "select_folder: no loaded folder with this id");
        }
        found
    }

    pub async fn select_palette(&self, palette: Palette) {
        self.dispatch(StateEvent::PaletteSelected(palette)).await;
    }

    /// Deletes `folder`, refreshes, and then clears the current folder
    /// whether or not it was the one deleted.
    pub async fn remove_folder(&self, folder: &Folder) {
        if let Err(err) = self.api.delete_folder(folder.id).await {
            warn!(folder_id = folder.id.0, error = %err, "delete folder failed");
            self.record(ErrorKind::DeleteFolder, &err).await;
            return;
        }
        info!(folder_id = folder.id.0, "deleted folder");

        self.refresh().await;
        self.dispatch(StateEvent::CurrentFolderCleared).await;
    }

    /// Deletes `palette`, refreshes, and re-derives the current folder from
    /// the palette's folder so the selection reflects the deletion. The
    /// selection is cleared if that folder is gone.
    pub async fn remove_palette_and_refresh(&self, palette: &Palette) {
        if let Err(err) = self.api.delete_palette(palette.id).await {
            warn!(palette_id = palette.id.0, error = %err, "delete palette failed");
            self.record(ErrorKind::DeletePalette, &err).await;
            return;
        }
        info!(
            palette_id = palette.id.0,
            folder_id = palette.folder_id.0,
            "deleted palette"
        );

        if self.refresh().await == RefreshOutcome::Failed {
            return;
        }
        let state = self
            .dispatch(StateEvent::CurrentFolderRederived(palette.folder_id))
            .await;
        if state.current_folder.is_none() {
            debug!(
                folder_id = palette.folder_id.0,
                "owning folder no longer loaded; clearing selection"
            );
        }
    }

    async fn load_folders(&self) -> Result<Vec<Folder>, ClientError> {
        let (raw_palettes, raw_folders) =
            futures::try_join!(self.api.get_palettes(), self.api.get_folders())?;
        let palettes = self.cleaner.clean_palettes(raw_palettes);
        let folders = self.cleaner.clean_folders(raw_folders);
        Ok(self.cleaner.clean_data(folders, palettes))
    }

    async fn record(&self, kind: ErrorKind, err: &ClientError) {
        self.dispatch(StateEvent::ErrorRecorded(AppError::from_client(kind, err)))
            .await;
    }

    async fn dispatch(&self, event: StateEvent) -> AppState {
        let next = {
            let mut guard = self.state.write().await;
            let next = reduce(std::mem::take(&mut *guard), event);
            *guard = next.clone();
            next
        };
        let _ = self.events.send(ControllerEvent::StateChanged(next.clone()));
        next
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
