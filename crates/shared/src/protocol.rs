use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{FolderId, PaletteId};

const NUMBERED_COLOR_PREFIX: &str = "color_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFolder {
    pub id: FolderId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Palette row as served by `GET /api/v1/palettes`.
///
/// Older rows store colors as numbered columns (`color_1`, `color_2`, ...);
/// newer ones send a `colors` array. Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPalette {
    pub id: PaletteId,
    pub folder_id: FolderId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawPalette {
    pub fn new(id: PaletteId, folder_id: FolderId, name: impl Into<String>) -> Self {
        Self {
            id,
            folder_id,
            name: name.into(),
            colors: None,
            created_at: None,
            updated_at: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    /// String values of `color_<n>` columns ordered by `n`. Null or
    /// non-string columns are skipped.
    pub fn numbered_colors(&self) -> Vec<String> {
        let mut numbered: Vec<(u32, &str)> = self
            .extra
            .iter()
            .filter_map(|(key, value)| {
                let index = key.strip_prefix(NUMBERED_COLOR_PREFIX)?.parse().ok()?;
                Some((index, value.as_str()?))
            })
            .collect();
        numbered.sort_by_key(|(index, _)| *index);
        numbered
            .into_iter()
            .map(|(_, color)| color.to_string())
            .collect()
    }
}
