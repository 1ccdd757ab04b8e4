//! Controller state and its pure transition function.

use shared::domain::{Folder, FolderId, Palette};

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub folders: Vec<Folder>,
    pub current_folder: Option<Folder>,
    pub current_palette: Option<Palette>,
    pub error: Option<AppError>,
    /// Generation handed to the most recently started refresh.
    pub refresh_issued: u64,
    /// Generation of the newest refresh whose result was written.
    pub refresh_applied: u64,
}

impl AppState {
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    /// A settle for `generation` is stale once an equal or newer refresh has
    /// already been written.
    pub fn is_stale(&self, generation: u64) -> bool {
        generation <= self.refresh_applied
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    RefreshStarted,
    RefreshSucceeded { generation: u64, folders: Vec<Folder> },
    RefreshFailed { generation: u64, error: AppError },
    FolderSelected(FolderId),
    /// Replaces the current folder with the loaded folder `id`, or `None`
    /// when it is no longer loaded.
    CurrentFolderRederived(FolderId),
    PaletteSelected(Palette),
    CurrentFolderCleared,
    ErrorRecorded(AppError),
}

pub fn reduce(mut state: AppState, event: StateEvent) -> AppState {
    match event {
        StateEvent::RefreshStarted => {
            state.refresh_issued += 1;
        }
        StateEvent::RefreshSucceeded {
            generation,
            folders,
        } => {
            if !state.is_stale(generation) {
                state.refresh_applied = generation;
                state.folders = folders;
                state.error = None;
            }
        }
        StateEvent::RefreshFailed { generation, error } => {
            if !state.is_stale(generation) {
                state.refresh_applied = generation;
                state.error = Some(error);
            }
        }
        StateEvent::FolderSelected(id) => {
            if let Some(folder) = state.folder(id).cloned() {
                state.current_folder = Some(folder);
            }
        }
        StateEvent::CurrentFolderRederived(id) => {
            state.current_folder = state.folder(id).cloned();
        }
        StateEvent::PaletteSelected(palette) => {
            state.current_palette = Some(palette);
        }
        StateEvent::CurrentFolderCleared => {
            state.current_folder = None;
        }
        StateEvent::ErrorRecorded(error) => {
            state.error = Some(error);
        }
    }
    state
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
