//! Command-line front end: one registry operation per invocation, applied to
//! the layout persisted in the state directory.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indoc::indoc;

use crate::command::{CommandSurface, KeyBindings, cycle_focus, snap_window};
use crate::config::{EngineConfig, parse_viewport};
use crate::constants::LAYOUT_STORAGE_KEY;
use crate::drivers::{ConsoleInputDriver, ConsoleOutputDriver, OutputDriver};
use crate::error::EngineResult;
use crate::geometry::{NoSurface, Point, Size, snap_to_grid};
use crate::layout::{Arrangement, SnapZone};
use crate::persistence::{self, FileStore};
use crate::runner::{self, DesktopApp};
use crate::window::{Capabilities, WindowConfig, WindowId, WindowRegistry, WindowState};

const AFTER_HELP: &str = indoc! {"
    Examples:
      desktop-wm open editor --title Notes
      desktop-wm move 1 40 60 --grid
      desktop-wm tile vertical
      desktop-wm run

    The layout lives in <STATE_DIR>/window-layout.json and is rewritten after
    every command that changes it.
"};

#[derive(Parser, Debug)]
#[command(
    name = "desktop-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Window manager engine for a simulated desktop",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Directory holding the persisted layout.
    #[arg(long, value_name = "DIR", default_value = ".desktop-wm", global = true)]
    pub state_dir: PathBuf,

    /// JSON file with engine tuning (minimum size, snapping, tiling spacing).
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Viewport in pixels, e.g. 1280x720. Overrides the config file.
    #[arg(long, value_name = "WxH", value_parser = parse_viewport, global = true)]
    pub viewport: Option<Size>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List windows (the default).
    Show {
        /// Print the persisted JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Open a window for an application.
    Open {
        app_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        x: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        y: Option<i32>,
        #[arg(long)]
        width: Option<i32>,
        #[arg(long)]
        height: Option<i32>,
        #[arg(long)]
        maximized: bool,
        #[arg(long)]
        no_minimize: bool,
        #[arg(long)]
        no_maximize: bool,
        #[arg(long)]
        no_close: bool,
        #[arg(long)]
        fixed_size: bool,
    },
    Close {
        id: WindowId,
    },
    Focus {
        id: WindowId,
    },
    Minimize {
        id: WindowId,
    },
    Maximize {
        id: WindowId,
    },
    /// Restore a minimized or maximized window.
    Restore {
        id: WindowId,
    },
    Move {
        id: WindowId,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        /// Round the target to the configured grid first.
        #[arg(long)]
        grid: bool,
    },
    Resize {
        id: WindowId,
        width: i32,
        height: i32,
    },
    Title {
        id: WindowId,
        title: String,
    },
    /// Cascade normal windows diagonally.
    Cascade,
    /// Tile normal windows.
    Tile {
        #[arg(default_value = "grid", value_name = "grid|horizontal|vertical")]
        arrangement: Arrangement,
    },
    /// Snap a window into half of the viewport.
    Snap {
        id: WindowId,
        #[arg(value_name = "left|right|top|bottom")]
        zone: SnapZone,
    },
    /// Focus the next (or previous) window.
    Cycle {
        #[arg(long)]
        backward: bool,
    },
    /// Print the interactive key bindings.
    Keys,
    /// Forget every window.
    Reset,
    /// Start the interactive terminal desktop.
    Run {
        /// Input poll interval in milliseconds.
        #[arg(long, default_value_t = 16)]
        poll_ms: u64,
    },
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, Some(Command::Run { .. }))
    }

    pub fn engine_config(&self) -> EngineResult<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if self.viewport.is_some() {
            config.viewport = self.viewport;
        }
        Ok(config)
    }
}

/// Run the parsed command line, returning what should be printed.
pub fn execute(cli: Cli) -> EngineResult<String> {
    let config = cli.engine_config()?;
    let mut store = FileStore::new(&cli.state_dir);
    let command = cli.command.unwrap_or(Command::Show { json: false });

    if let Command::Run { poll_ms } = command {
        let mut output = ConsoleOutputDriver::new()?;
        let (cols, rows) = output.size()?;
        let mut app =
            DesktopApp::new(&config, Box::new(store), LAYOUT_STORAGE_KEY, cols, rows);
        runner::run(
            &mut app,
            ConsoleInputDriver::new(),
            &mut output,
            Duration::from_millis(poll_ms),
        )?;
        return Ok(String::new());
    }

    let seed = persistence::restore_or_default(&store, LAYOUT_STORAGE_KEY);
    let viewport = config.resolve_viewport(&NoSurface);
    let mut registry = config.registry(seed, viewport);
    let before = registry.revision();

    let printed = apply(&command, &mut registry, &config);
    if registry.revision() != before {
        persistence::save(&mut store, LAYOUT_STORAGE_KEY, &registry)?;
    }
    match printed {
        Some(text) => Ok(text),
        None => match command {
            Command::Show { json: true } => persistence::to_json(&registry),
            _ => Ok(render_table(&registry)),
        },
    }
}

/// Apply one command to `registry`. Returns text that replaces the window
/// table in the output, if any.
pub fn apply(
    command: &Command,
    registry: &mut WindowRegistry,
    config: &EngineConfig,
) -> Option<String> {
    if let Some(id) = command.target()
        && !registry.contains(id)
    {
        tracing::warn!(window_id = %id, "no such window");
    }
    match command {
        Command::Show { .. } | Command::Run { .. } => {}
        Command::Open {
            app_id,
            title,
            x,
            y,
            width,
            height,
            maximized,
            no_minimize,
            no_maximize,
            no_close,
            fixed_size,
        } => {
            let defaults = WindowConfig::default();
            let position = match (x, y) {
                (None, None) => None,
                (x, y) => Some(Point::new(x.unwrap_or(0), y.unwrap_or(0))),
            };
            let window = WindowConfig {
                position,
                size: Size::new(
                    width.unwrap_or(defaults.size.width),
                    height.unwrap_or(defaults.size.height),
                ),
                capabilities: Capabilities {
                    minimizable: !no_minimize,
                    maximizable: !no_maximize,
                    closeable: !no_close,
                    resizable: !fixed_size,
                },
                state: if *maximized {
                    WindowState::Maximized
                } else {
                    WindowState::Normal
                },
            };
            let title = title.clone().unwrap_or_else(|| app_id.clone());
            let id = registry.open(app_id.as_str(), title, window);
            tracing::info!(window_id = %id, "opened");
        }
        Command::Close { id } => registry.close(*id),
        Command::Focus { id } => registry.focus(*id),
        Command::Minimize { id } => registry.minimize(*id),
        Command::Maximize { id } => registry.maximize(*id),
        Command::Restore { id } => match registry.get(*id).map(|w| w.state) {
            Some(WindowState::Minimized) => registry.restore(*id),
            Some(WindowState::Maximized) => registry.restore_from_maximize(*id),
            _ => {}
        },
        Command::Move { id, x, y, grid } => {
            let (x, y) = if *grid {
                (
                    snap_to_grid(*x, config.grid_size),
                    snap_to_grid(*y, config.grid_size),
                )
            } else {
                (*x, *y)
            };
            registry.move_to(*id, x, y);
        }
        Command::Resize { id, width, height } => registry.resize(*id, *width, *height),
        Command::Title { id, title } => registry.set_title(*id, title.as_str()),
        Command::Cascade => surface(config).arrange(registry, Arrangement::Cascade),
        Command::Tile { arrangement } => surface(config).arrange(registry, *arrangement),
        Command::Snap { id, zone } => snap_window(registry, *id, *zone),
        Command::Cycle { backward } => {
            cycle_focus(registry, !backward);
        }
        Command::Keys => return Some(render_keys(&KeyBindings::default())),
        Command::Reset => {
            for id in registry.windows().iter().map(|w| w.id).collect::<Vec<_>>() {
                registry.close(id);
            }
        }
    }
    None
}

impl Command {
    /// Window a command addresses, if it names one.
    pub fn target(&self) -> Option<WindowId> {
        match self {
            Command::Close { id }
            | Command::Focus { id }
            | Command::Minimize { id }
            | Command::Maximize { id }
            | Command::Restore { id }
            | Command::Move { id, .. }
            | Command::Resize { id, .. }
            | Command::Title { id, .. }
            | Command::Snap { id, .. } => Some(*id),
            _ => None,
        }
    }
}

fn surface(config: &EngineConfig) -> CommandSurface {
    CommandSurface::new(KeyBindings::default(), config.layout_options())
}

pub fn render_table(registry: &WindowRegistry) -> String {
    let mut out = String::new();
    let viewport = registry.viewport();
    let _ = writeln!(
        out,
        "viewport {}x{}, {} window(s)",
        viewport.width,
        viewport.height,
        registry.len()
    );
    if registry.is_empty() {
        return out;
    }
    let _ = writeln!(
        out,
        "{:>4}  {:<12} {:<20} {:<10} {:>6} {:>6} {:>6} {:>6} {:>4}",
        "ID", "APP", "TITLE", "STATE", "X", "Y", "W", "H", "Z"
    );
    let mut windows = registry.windows();
    windows.sort_by_key(|w| w.id);
    for w in windows {
        let marker = if registry.is_focused(w.id) { "*" } else { " " };
        let title: String = w.title.chars().take(20).collect();
        let app: String = w.app_id.chars().take(12).collect();
        let _ = writeln!(
            out,
            "{:>3}{}  {:<12} {:<20} {:<10} {:>6} {:>6} {:>6} {:>6} {:>4}",
            w.id,
            marker,
            app,
            title,
            w.state.to_string(),
            w.position.x,
            w.position.y,
            w.size.width,
            w.size.height,
            w.z_index
        );
    }
    out
}

fn render_keys(bindings: &KeyBindings) -> String {
    let mut out = String::new();
    for (intent, combos) in bindings.help_entries() {
        let _ = writeln!(out, "{:<28} {}", intent.to_string(), combos.join(", "));
    }
    let _ = writeln!(out, "{:<28} Ctrl+N", "Open a window");
    let _ = writeln!(out, "{:<28} Ctrl+Q", "Quit");
    out
}
