//! JSON persistence of the window layout.
//!
//! The persisted form mirrors the registry minus transient state. Loading is
//! forgiving: unknown fields are ignored, missing fields take defaults, and a
//! missing or unreadable entry yields an empty layout with a warning.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PERSISTED_COUNTER;
use crate::error::EngineResult;
use crate::geometry::{Point, Rect, Size};
use crate::window::{
    Capabilities, RegistrySeed, WindowId, WindowRecord, WindowRegistry, WindowState,
};

pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedLayout {
    pub version: u32,
    pub next_id: u64,
    pub z_counter: u64,
    pub focused: Option<WindowId>,
    /// Keyed by the decimal window id.
    pub windows: BTreeMap<String, PersistedWindow>,
}

impl Default for PersistedLayout {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION,
            next_id: 1,
            z_counter: 0,
            focused: None,
            windows: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedWindow {
    pub app_id: String,
    pub title: String,
    pub position: Point,
    pub size: Size,
    pub z_index: u64,
    pub state: WindowState,
    pub capabilities: Capabilities,
    pub previous_geometry: Option<Rect>,
}

impl Default for PersistedWindow {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            title: String::new(),
            position: Point::default(),
            size: Size::new(
                crate::constants::DEFAULT_WINDOW_WIDTH,
                crate::constants::DEFAULT_WINDOW_HEIGHT,
            ),
            z_index: 0,
            state: WindowState::Normal,
            capabilities: Capabilities::default(),
            previous_geometry: None,
        }
    }
}

impl From<&WindowRecord> for PersistedWindow {
    fn from(record: &WindowRecord) -> Self {
        Self {
            app_id: record.app_id.clone(),
            title: record.title.clone(),
            position: record.position,
            size: record.size,
            z_index: record.z_index,
            state: record.state,
            capabilities: record.capabilities,
            previous_geometry: record.previous_geometry,
        }
    }
}

pub fn serialize(registry: &WindowRegistry) -> PersistedLayout {
    PersistedLayout {
        version: LAYOUT_VERSION,
        next_id: registry.next_id(),
        z_counter: registry.z_counter(),
        focused: registry.focused(),
        windows: registry
            .windows()
            .into_iter()
            .map(|w| (w.id.to_string(), PersistedWindow::from(w)))
            .collect(),
    }
}

pub fn to_json(registry: &WindowRegistry) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(&serialize(registry))?)
}

pub fn from_json(json: &str) -> EngineResult<PersistedLayout> {
    Ok(serde_json::from_str(json)?)
}

/// Turn a persisted layout into a registry seed, repairing anything that
/// would break the registry's invariants.
pub fn deserialize(layout: PersistedLayout) -> RegistrySeed {
    let mut records: Vec<WindowRecord> = Vec::with_capacity(layout.windows.len());
    for (key, window) in layout.windows {
        let Ok(id) = key.parse::<WindowId>() else {
            tracing::warn!(key = %key, "skipping persisted window with invalid id");
            continue;
        };
        if id.get() > MAX_PERSISTED_COUNTER {
            tracing::warn!(window_id = %id, "skipping persisted window with out-of-range id");
            continue;
        }
        let mut state = window.state;
        let mut previous_geometry = window.previous_geometry;
        match (state, previous_geometry) {
            (WindowState::Maximized, None) => {
                tracing::warn!(window_id = %id, "maximized window without saved geometry demoted");
                state = WindowState::Normal;
            }
            (WindowState::Normal | WindowState::Minimized, Some(_)) => {
                previous_geometry = None;
            }
            _ => {}
        }
        records.push(WindowRecord {
            id,
            app_id: window.app_id,
            title: window.title,
            position: window.position,
            size: window.size,
            z_index: window.z_index,
            state,
            previous_geometry,
            capabilities: window.capabilities,
            interaction: None,
        });
    }

    records.sort_by_key(|w| (w.z_index, w.id));
    let mut last_z = 0;
    for record in records.iter_mut() {
        if record.z_index <= last_z {
            record.z_index = last_z.saturating_add(1);
        }
        last_z = record.z_index;
    }
    let mut z_counter = layout.z_counter;
    if z_counter > MAX_PERSISTED_COUNTER || last_z > MAX_PERSISTED_COUNTER {
        tracing::warn!("persisted z-order out of range, renumbering");
        for (z, record) in (1..).zip(records.iter_mut()) {
            record.z_index = z;
            last_z = z;
        }
        z_counter = 0;
    }

    let focused = layout.focused.filter(|id| {
        records
            .iter()
            .any(|w| w.id == *id && !w.is_minimized())
    });
    let max_id = records.iter().map(|w| w.id.get()).max().unwrap_or(0);
    let next_id = if layout.next_id > MAX_PERSISTED_COUNTER + 1 {
        tracing::warn!(next_id = layout.next_id, "persisted next id out of range");
        0
    } else {
        layout.next_id
    };

    RegistrySeed {
        focused,
        z_counter: z_counter.max(last_z),
        next_id: next_id.max(max_id + 1),
        windows: records,
    }
}

/// Key-value storage for serialized layouts.
pub trait LayoutStore {
    fn load(&self, key: &str) -> EngineResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> EngineResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl LayoutStore for MemoryStore {
    fn load(&self, key: &str) -> EngineResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> EngineResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per entry inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LayoutStore for FileStore {
    fn load(&self, key: &str) -> EngineResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> EngineResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Load the seed stored under `key`, or an empty one when the entry is
/// missing or unusable.
pub fn restore_or_default(store: &dyn LayoutStore, key: &str) -> RegistrySeed {
    let json = match store.load(key) {
        Ok(Some(json)) => json,
        Ok(None) => {
            tracing::debug!(key, "no persisted layout");
            return RegistrySeed::default();
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read persisted layout");
            return RegistrySeed::default();
        }
    };
    match from_json(&json) {
        Ok(layout) => {
            let seed = deserialize(layout);
            tracing::debug!(key, windows = seed.windows.len(), "restored layout");
            seed
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding corrupt persisted layout");
            RegistrySeed::default()
        }
    }
}

/// Write the registry under `key`. Failures are logged; callers may ignore
/// the returned error.
pub fn save(store: &mut dyn LayoutStore, key: &str, registry: &WindowRegistry) -> EngineResult<()> {
    let result = to_json(registry).and_then(|json| store.save(key, &json));
    match &result {
        Ok(()) => tracing::trace!(key, revision = registry.revision(), "layout saved"),
        Err(err) => tracing::warn!(key, error = %err, "failed to save layout"),
    }
    result
}
