use std::path::PathBuf;

use clap::{Parser, Subcommand};
use layerboard::compose::{Drawable, compose};
use layerboard::config::{ConfigError, EditorConfig};
use layerboard::doc::Scene;
use layerboard::snapshot::SceneSnapshot;
use layerboard::store::{FileSnapshotStore, ShareId, SnapshotStore, StoreError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid snapshot JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "layerboard", about = "Inspect and import layerboard scene snapshots")]
struct Cli {
    /// Snapshot directory; overrides `LAYERBOARD_SNAPSHOT_DIR`.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the back-to-front draw order of a stored snapshot.
    Inspect { id: ShareId },
    /// Read a snapshot file, back-fill missing layers, and store it under a new id.
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = EditorConfig::from_env()?;
    let store = FileSnapshotStore::new(cli.snapshot_dir.unwrap_or(config.snapshot_dir));

    match cli.command {
        Command::Inspect { id } => run_inspect(&store, id).await,
        Command::Import { path } => run_import(&store, path).await,
    }
}

async fn run_inspect(store: &FileSnapshotStore, id: ShareId) -> Result<(), CliError> {
    let scene = Scene::from(store.load(id).await?);
    println!("background {} guides {}", scene.settings.background, scene.settings.show_guides);
    for item in compose(&scene) {
        match item {
            Drawable::Image(d) => println!(
                "{:>4} image {} scale={} rotation={} at ({:.2}, {:.2})",
                d.layer,
                d.id,
                d.props.scale,
                d.props.rotation,
                d.placement.center().x,
                d.placement.center().y
            ),
            Drawable::Text(d) => {
                println!("{:>4} text  {} {:?} at ({:.2}, {:.2})", d.layer, d.id, d.props.content, d.center.x, d.center.y);
            }
        }
    }
    Ok(())
}

async fn run_import(store: &FileSnapshotStore, path: PathBuf) -> Result<(), CliError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| CliError::Read { path: path.clone(), source })?;
    let legacy: SceneSnapshot = serde_json::from_slice(&bytes)?;
    let scene = Scene::from(legacy);
    let id = store.save(&SceneSnapshot::from(&scene)).await?;
    println!("{id}");
    Ok(())
}
