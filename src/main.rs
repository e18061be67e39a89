mod app;
mod components;
mod config;
mod event;
mod handler;
mod print;
mod theme;
mod tui;
mod ui;
mod watcher;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathtree::error::{AppError, Result};
use pathtree::panel::Panel;
use pathtree::source::WalkOptions;

use crate::app::{App, PanelSource};
use crate::config::{AppConfig, GeneralConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};
use crate::ui::ViewOptions;
use crate::watcher::SourceWatcher;

/// Browse a directory and a change list as collapsible trees with multi-selection.
#[derive(Parser, Debug)]
#[command(name = "ptree", version, about)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Status file in `git status --porcelain` format, shown as a second panel
    #[arg(long, value_name = "FILE")]
    changes: Option<PathBuf>,

    /// Path to config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial search query
    #[arg(long, short)]
    query: Option<String>,

    /// Start with every folder expanded
    #[arg(long)]
    expand_all: bool,

    /// Print the tree to stdout instead of starting the TUI
    #[arg(long)]
    print: bool,

    /// Print the tree as JSON (implies --print)
    #[arg(long)]
    json: bool,

    /// Disable source watching (auto-reload)
    #[arg(long)]
    no_watcher: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Write logs to this file (filter with PTREE_LOG, default "warn")
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Partial config built from flags; merged over every config file.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: self.no_mouse.then_some(false),
                ..Default::default()
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn init_tracing(log_path: &Path) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let file = File::options().create(true).append(true).open(log_path)?;
    let filter = EnvFilter::try_from_env("PTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .map_err(|e| AppError::Io(io::Error::other(e)))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        init_tracing(log_file)?;
    }

    let path = cli.path.canonicalize().map_err(|_| {
        AppError::InvalidPath(format!("{} does not exist", cli.path.display()))
    })?;

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let mut sources = vec![(
        "Files".to_string(),
        PanelSource::Walk {
            root: path.clone(),
            options: WalkOptions {
                show_hidden: config.show_hidden(),
                ignore: config.walk_ignore(),
            },
        },
    )];
    if let Some(changes) = &cli.changes {
        sources.push(("Changes".to_string(), PanelSource::StatusFile(changes.clone())));
    }

    let mut app = App::new(sources)?;
    tracing::info!(root = %path.display(), panels = app.panels.len(), "starting");

    let print_mode = cli.print || cli.json;
    for view in &mut app.panels {
        // Expand before searching: expand-all is refused while a query is active.
        if cli.expand_all || print_mode {
            view.panel.expand_all();
        }
        if let Some(query) = &cli.query {
            view.panel.set_query(query);
        }
    }

    if print_mode {
        let panels: Vec<&Panel> = app.panels.iter().map(|view| &view.panel).collect();
        let mut stdout = io::stdout().lock();
        return if cli.json {
            print::write_json(&panels, &mut stdout)
        } else {
            print::write_text(&panels, &mut stdout)
        };
    }

    install_panic_hook();

    let view = ViewOptions {
        theme: theme::resolve_theme(&config.theme),
        use_icons: config.use_icons(),
        show_status: config.show_status(),
    };

    tracing::debug!(scheme = config.theme_scheme(), "theme resolved");

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));

    // Keep watchers alive for the whole session; dropping one stops it.
    let mut watchers = Vec::new();
    if config.watcher_enabled() {
        for (index, panel_view) in app.panels.iter().enumerate() {
            match SourceWatcher::new(
                index,
                panel_view.source.watch_target(),
                Duration::from_millis(config.debounce_ms()),
                config.walk_ignore(),
                events.sender(),
            ) {
                Ok(watcher) => watchers.push(watcher),
                Err(e) => tracing::warn!(panel = index, error = %e, "watcher unavailable"),
            }
        }
        if watchers.len() < app.panels.len() {
            app.set_status_message("⚠ Watcher unavailable for some panels".to_string());
        }
    }
    app.watcher_active = !watchers.is_empty();

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, &view, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize => {}
            Event::SourceChanged(index) => app.handle_source_changed(index),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
