use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{AppController, HttpPaletteApi, MissingPaletteApi, PaletteApi, RefreshOutcome};
use shared::domain::{Folder, FolderId, Palette, PaletteId};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_api_url, Settings};

#[derive(Parser, Debug)]
#[command(about = "Browse and prune palettes stored on a palette picker API")]
struct Args {
    /// Overrides `api_url` from picker.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List folders with their palette counts.
    List,
    /// Show the palettes of one folder.
    Show { folder_id: i64 },
    DeleteFolder { folder_id: i64 },
    DeletePalette { palette_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url.as_deref() {
        settings.api_url = normalize_api_url(api_url);
    }

    let controller = AppController::new(build_api(&settings)?);

    if controller.on_mount().await == RefreshOutcome::Failed {
        return Err(recorded_error(&controller).await);
    }

    run_command(&controller, args.command).await
}

fn build_api(settings: &Settings) -> Result<Arc<dyn PaletteApi>> {
    if !settings.api_enabled {
        tracing::warn!("palette api disabled; running without a backend");
        return Ok(Arc::new(MissingPaletteApi));
    }
    let api = HttpPaletteApi::with_timeout(&settings.api_url, settings.request_timeout())
        .with_context(|| format!("failed to build palette api client for {}", settings.api_url))?;
    Ok(Arc::new(api))
}

async fn run_command(controller: &AppController, command: Command) -> Result<()> {
    match command {
        Command::List => {
            for folder in controller.folders().await {
                println!("{}", format_folder_line(&folder));
            }
        }
        Command::Show { folder_id } => {
            if !controller.select_folder(FolderId(folder_id)).await {
                bail!("no folder with id {folder_id}");
            }
            print_current_folder(controller).await;
        }
        Command::DeleteFolder { folder_id } => {
            let folder = controller
                .folders()
                .await
                .into_iter()
                .find(|folder| folder.id == FolderId(folder_id))
                .ok_or_else(|| anyhow!("no folder with id {folder_id}"))?;
            controller.remove_folder(&folder).await;
            fail_on_recorded_error(controller).await?;
            println!("Deleted folder {} ({})", folder.id, folder.name);
        }
        Command::DeletePalette { palette_id } => {
            let palette = find_palette(&controller.folders().await, PaletteId(palette_id))
                .ok_or_else(|| anyhow!("no palette with id {palette_id}"))?;
            controller.remove_palette_and_refresh(&palette).await;
            fail_on_recorded_error(controller).await?;
            println!("Deleted palette {} ({})", palette.id, palette.name);
            print_current_folder(controller).await;
        }
    }
    Ok(())
}

async fn print_current_folder(controller: &AppController) {
    let Some(folder) = controller.current_folder().await else {
        return;
    };
    println!("{}", format_folder_line(&folder));
    for palette in &folder.palettes {
        println!("  {}", format_palette_line(palette));
    }
}

async fn fail_on_recorded_error(controller: &AppController) -> Result<()> {
    match controller.error().await {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

async fn recorded_error(controller: &AppController) -> anyhow::Error {
    match controller.error().await {
        Some(err) => err.into(),
        None => anyhow!("refresh failed without a recorded error"),
    }
}

fn find_palette(folders: &[Folder], id: PaletteId) -> Option<Palette> {
    folders
        .iter()
        .find_map(|folder| folder.palette(id))
        .cloned()
}

fn format_folder_line(folder: &Folder) -> String {
    let count = folder.palettes.len();
    let noun = if count == 1 { "palette" } else { "palettes" };
    format!("[{}] {} ({count} {noun})", folder.id, folder.name)
}

fn format_palette_line(palette: &Palette) -> String {
    if palette.colors.is_empty() {
        return format!("[{}] {}", palette.id, palette.name);
    }
    format!(
        "[{}] {}: {}",
        palette.id,
        palette.name,
        palette.colors.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(id: i64, colors: &[&str]) -> Palette {
        Palette {
            id: PaletteId(id),
            folder_id: FolderId(1),
            name: format!("Palette {id}"),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn formats_folder_and_palette_lines() {
        let mut folder = Folder::new(FolderId(1), "Warm");
        folder.palettes.push(palette(22, &["#FF0000", "#FFAA00"]));

        assert_eq!(format_folder_line(&folder), "[1] Warm (1 palette)");
        assert_eq!(
            format_palette_line(&folder.palettes[0]),
            "[22] Palette 22: #FF0000 #FFAA00"
        );
        assert_eq!(format_palette_line(&palette(23, &[])), "[23] Palette 23");
    }

    #[test]
    fn finds_palette_across_folders() {
        let mut first = Folder::new(FolderId(1), "One");
        first.palettes.push(palette(22, &[]));
        let mut second = Folder::new(FolderId(2), "Two");
        second.palettes.push(palette(24, &[]));

        let found = find_palette(&[first, second], PaletteId(24)).expect("palette 24");
        assert_eq!(found.id, PaletteId(24));
        assert!(find_palette(&[], PaletteId(24)).is_none());
    }

    #[tokio::test]
    async fn disabled_api_mounts_with_unavailable_error() {
        let settings = Settings {
            api_enabled: false,
            ..Settings::default()
        };
        let controller = AppController::new(build_api(&settings).expect("build api"));

        assert_eq!(controller.on_mount().await, RefreshOutcome::Failed);
        let err = recorded_error(&controller).await;
        assert_eq!(err.to_string(), "fetch failed: no palette api configured");
    }

    #[test]
    fn enabled_api_builds_http_client() {
        assert!(build_api(&Settings::default()).is_ok());
        let broken = Settings {
            api_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(build_api(&broken).is_err());
    }

    #[test]
    fn parses_subcommands() {
        let args = Args::try_parse_from(["picker", "--api-url", "localhost:4000", "delete-palette", "22"])
            .expect("parse args");
        assert_eq!(args.api_url.as_deref(), Some("localhost:4000"));
        assert!(matches!(args.command, Command::DeletePalette { palette_id: 22 }));
    }
}
