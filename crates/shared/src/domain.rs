use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(FolderId);
id_newtype!(PaletteId);

/// A named, ordered set of colors that belongs to exactly one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: PaletteId,
    pub folder_id: FolderId,
    pub name: String,
    pub colors: Vec<String>,
}

/// A folder together with the palettes merged into it.
///
/// `palettes` stays empty until the folder has gone through
/// `clean_data`; raw folder listings never carry palettes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub palettes: Vec<Palette>,
}

impl Folder {
    pub fn new(id: FolderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            palettes: Vec::new(),
        }
    }

    pub fn palette(&self, id: PaletteId) -> Option<&Palette> {
        self.palettes.iter().find(|palette| palette.id == id)
    }
}
