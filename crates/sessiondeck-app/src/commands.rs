//! Subcommand implementations.

use sessiondeck_common::{Result, SessionDeckError, StoreError};
use sessiondeck_config::SessionDeckConfig;
use sessiondeck_layout::{JsonLayoutStore, LayoutGeometry, LayoutStore, TabLayout};
use sessiondeck_session::{EngineSettings, Pacing, SessionController};
use std::sync::Arc;

use crate::cli::{Command, LayoutsCommand};
use crate::headless::{FixedProfiles, HeadlessHost};

pub async fn run(command: Command, config: &SessionDeckConfig) -> Result<()> {
    match command {
        Command::Layouts(cmd) => run_layouts(cmd, &open_store(config)?).await,
        Command::Apply {
            id,
            window,
            profiles,
            fast,
        } => apply(config, &id, window, profiles, fast).await,
        Command::Config => {
            println!("{}", sessiondeck_config::config_to_json(config));
            Ok(())
        }
    }
}

fn open_store(config: &SessionDeckConfig) -> Result<JsonLayoutStore> {
    let store = match &config.storage.layouts_file {
        Some(path) => JsonLayoutStore::new(path),
        None => JsonLayoutStore::open_default()?,
    };
    tracing::debug!(path = %store.path().display(), "layout store opened");
    Ok(store)
}

async fn run_layouts(command: LayoutsCommand, store: &JsonLayoutStore) -> Result<()> {
    match command {
        LayoutsCommand::List => {
            let layouts = store.list().await?;
            if layouts.is_empty() {
                println!("No saved layouts ({})", store.path().display());
            }
            for layout in &layouts {
                println!("{}", summary_line(layout));
            }
        }
        LayoutsCommand::Show { id } => {
            let layout = store
                .get(&id)
                .await?
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let json = serde_json::to_string_pretty(&layout).map_err(StoreError::from)?;
            println!("{json}");
        }
        LayoutsCommand::Delete { id } => {
            if !store.delete(&id).await? {
                return Err(StoreError::NotFound(id).into());
            }
            println!("Deleted {id}");
        }
        LayoutsCommand::Rename { id, name } => {
            let layout = store.rename(&id, &name).await?;
            println!("{}", summary_line(&layout));
        }
    }
    Ok(())
}

fn summary_line(layout: &TabLayout) -> String {
    let mut line = format!(
        "{}  {}  {} tab(s)  updated {}",
        layout.id,
        layout.name,
        layout.tabs.len(),
        layout.updated_at
    );
    if let Some(split) = &layout.split {
        line.push_str(&format!("  split {}|{}", split.left_id, split.right_id));
    }
    if !layout.layouts.is_empty() {
        line.push_str(&format!("  {} grid(s)", layout.layouts.len()));
    }
    line
}

async fn apply(
    config: &SessionDeckConfig,
    layout_id: &str,
    window: Option<(u32, u32)>,
    profiles: Vec<String>,
    fast: bool,
) -> Result<()> {
    let mut settings = EngineSettings::from_config(config);
    if let Some((width, height)) = window {
        settings.window.width = f64::from(width);
        settings.window.height = f64::from(height);
    }
    if fast {
        settings.pacing = Pacing::none();
    }
    // A dry run never writes back to the layout file.
    settings.auto_save = false;

    let store: Arc<dyn LayoutStore> = Arc::new(open_store(config)?);
    let host = Arc::new(HeadlessHost::new(LayoutGeometry::new(config.chrome.split_gap)));
    let controller = SessionController::new(
        host.clone(),
        store,
        Arc::new(FixedProfiles::new(profiles)),
        settings,
    );

    let report = controller.apply_layout_by_id(layout_id).await?;
    controller.refresh_bounds().await;

    println!("Applied {} ({} opened)", report.layout_id, report.opened.len());
    for id in &report.failed {
        println!("  failed:  {id}");
    }
    for id in &report.dropped {
        println!("  dropped: {id}");
    }
    if !host.content_visible() {
        return Err(SessionDeckError::Other("content left hidden after apply".into()));
    }

    let snapshot = controller.snapshot();
    println!("Content area {}", host.bounds());
    for (id, rect) in host.placements() {
        let active = if snapshot.active_id.as_deref() == Some(id.as_str()) {
            "*"
        } else {
            " "
        };
        let logged_out = if host.is_logged_out(&id) { "  (logged out)" } else { "" };
        println!("{active} {id:<24} {rect}{logged_out}");
    }
    Ok(())
}
