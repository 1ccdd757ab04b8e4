//! Normalization of raw API rows into the shapes kept in [`AppState`].
//!
//! [`AppState`]: crate::state::AppState

use std::collections::HashMap;

use shared::{
    domain::{Folder, FolderId, Palette},
    protocol::{RawFolder, RawPalette},
};
use tracing::debug;

pub trait DataCleaner: Send + Sync {
    fn clean_palettes(&self, raw: Vec<RawPalette>) -> Vec<Palette>;
    fn clean_folders(&self, raw: Vec<RawFolder>) -> Vec<Folder>;
    fn clean_data(&self, folders: Vec<Folder>, palettes: Vec<Palette>) -> Vec<Folder>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCleaner;

impl DataCleaner for StandardCleaner {
    fn clean_palettes(&self, raw: Vec<RawPalette>) -> Vec<Palette> {
        clean_palettes(raw)
    }

    fn clean_folders(&self, raw: Vec<RawFolder>) -> Vec<Folder> {
        clean_folders(raw)
    }

    fn clean_data(&self, folders: Vec<Folder>, palettes: Vec<Palette>) -> Vec<Folder> {
        clean_data(folders, palettes)
    }
}

pub fn clean_palettes(raw: Vec<RawPalette>) -> Vec<Palette> {
    raw.into_iter().map(clean_palette).collect()
}

fn clean_palette(raw: RawPalette) -> Palette {
    let source = match raw.colors {
        Some(ref colors) if !colors.is_empty() => colors.clone(),
        _ => raw.numbered_colors(),
    };
    Palette {
        id: raw.id,
        folder_id: raw.folder_id,
        name: raw.name.trim().to_string(),
        colors: source
            .iter()
            .filter_map(|color| {
                let normalized = normalize_color(color);
                if normalized.is_none() {
                    debug!(palette_id = raw.id.0, color = %color, "dropping invalid color");
                }
                normalized
            })
            .collect(),
    }
}

pub fn clean_folders(raw: Vec<RawFolder>) -> Vec<Folder> {
    raw.into_iter()
        .map(|folder| Folder::new(folder.id, folder.name.trim()))
        .collect()
}

/// Attaches every palette to the folder it references. Palettes whose
/// folder is not in `folders` are dropped.
pub fn clean_data(folders: Vec<Folder>, palettes: Vec<Palette>) -> Vec<Folder> {
    let mut by_folder: HashMap<FolderId, Vec<Palette>> = HashMap::new();
    for palette in palettes {
        by_folder.entry(palette.folder_id).or_default().push(palette);
    }

    let merged: Vec<Folder> = folders
        .into_iter()
        .map(|mut folder| {
            if let Some(owned) = by_folder.remove(&folder.id) {
                folder.palettes.extend(owned);
            }
            folder
        })
        .collect();

    for (folder_id, orphans) in by_folder {
        debug!(
            folder_id = folder_id.0,
            count = orphans.len(),
            "dropping palettes without an owning folder"
        );
    }

    merged
}

/// `#rrggbb`, `RRGGBB` and ` #RrGgBb ` all become `#RRGGBB`; three digit
/// shorthands keep their length. Anything that is not 3 or 6 hex digits
/// after an optional `#` yields `None`.
pub fn normalize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !matches!(body.len(), 3 | 6) || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", body.to_ascii_uppercase()))
}
