//! Palette picker client: API access, data cleaning and the state
//! controller that ties them together.

pub mod api;
pub mod cleaners;
pub mod controller;
pub mod error;
pub mod state;

pub use api::{HttpPaletteApi, MissingPaletteApi, PaletteApi};
pub use cleaners::{DataCleaner, StandardCleaner};
pub use controller::{AppController, ControllerEvent, RefreshOutcome};
pub use error::{AppError, ClientError, ErrorKind};
pub use state::AppState;
