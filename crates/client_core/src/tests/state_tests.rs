use super::*;
use crate::error::ErrorKind;
use shared::domain::PaletteId;

fn folders() -> Vec<Folder> {
    vec![
        Folder::new(FolderId(1), "Folder 1"),
        Folder::new(FolderId(2), "Folder 2"),
    ]
}

fn started(state: AppState) -> (AppState, u64) {
    let state = reduce(state, StateEvent::RefreshStarted);
    let generation = state.refresh_issued;
    (state, generation)
}

#[test]
fn refresh_success_replaces_folders_and_clears_error() {
    let state = AppState {
        error: Some(AppError::new(ErrorKind::Fetch, "earlier failure")),
        ..AppState::default()
    };
    let (state, generation) = started(state);

    let state = reduce(
        state,
        StateEvent::RefreshSucceeded {
            generation,
            folders: folders(),
        },
    );

    assert_eq!(state.folders, folders());
    assert_eq!(state.error, None);
    assert_eq!(state.refresh_applied, generation);
}

#[test]
fn refresh_failure_keeps_folders() {
    let state = AppState {
        folders: folders(),
        ..AppState::default()
    };
    let (state, generation) = started(state);
    let error = AppError::new(ErrorKind::Fetch, "There was a problem fetching palettes.");

    let state = reduce(
        state,
        StateEvent::RefreshFailed {
            generation,
            error: error.clone(),
        },
    );

    assert_eq!(state.folders, folders());
    assert_eq!(state.error, Some(error));
}

#[test]
fn older_refresh_settling_late_is_discarded() {
    let (state, first) = started(AppState::default());
    let (state, second) = started(state);

    let fresh = vec![Folder::new(FolderId(9), "Fresh")];
    let state = reduce(
        state,
        StateEvent::RefreshSucceeded {
            generation: second,
            folders: fresh.clone(),
        },
    );
    let state = reduce(
        state,
        StateEvent::RefreshSucceeded {
            generation: first,
            folders: folders(),
        },
    );
    let state = reduce(
        state,
        StateEvent::RefreshFailed {
            generation: first,
            error: AppError::new(ErrorKind::Fetch, "late"),
        },
    );

    assert_eq!(state.folders, fresh);
    assert_eq!(state.error, None);
    assert_eq!(state.refresh_applied, second);
}

#[test]
fn selecting_unknown_folder_leaves_selection_unchanged() {
    let state = AppState {
        folders: folders(),
        ..AppState::default()
    };
    let state = reduce(state, StateEvent::FolderSelected(FolderId(2)));
    assert_eq!(state.current_folder, Some(Folder::new(FolderId(2), "Folder 2")));

    let state = reduce(state, StateEvent::FolderSelected(FolderId(42)));
    assert_eq!(state.current_folder, Some(Folder::new(FolderId(2), "Folder 2")));
}

#[test]
fn palette_selection_and_folder_reset_are_plain_writes() {
    let palette = Palette {
        id: PaletteId(22),
        folder_id: FolderId(1),
        name: "Mock Palette 1".into(),
        colors: Vec::new(),
    };
    let state = AppState {
        folders: folders(),
        current_folder: Some(Folder::new(FolderId(1), "Folder 1")),
        ..AppState::default()
    };

    let state = reduce(state, StateEvent::PaletteSelected(palette.clone()));
    let state = reduce(state, StateEvent::CurrentFolderCleared);

    assert_eq!(state.current_palette, Some(palette));
    assert_eq!(state.current_folder, None);
    assert_eq!(state.folders, folders());
}

#[test]
fn rederiving_missing_folder_clears_selection() {
    let state = AppState {
        folders: folders(),
        current_folder: Some(Folder::new(FolderId(2), "Folder 2")),
        ..AppState::default()
    };

    let state = reduce(state, StateEvent::CurrentFolderRederived(FolderId(1)));
    assert_eq!(state.current_folder, Some(Folder::new(FolderId(1), "Folder 1")));

    let state = reduce(state, StateEvent::CurrentFolderRederived(FolderId(42)));
    assert_eq!(state.current_folder, None);
}
