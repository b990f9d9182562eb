use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::{Interaction, WindowConfig, WindowId, WindowRecord, WindowState};
use crate::constants::{CASCADE_STEP, MAX_PERSISTED_COUNTER};
use crate::geometry::{
    ClampConstraints, Point, Rect, Size, cascade_offset, clamp_position, clamp_rect,
};
use crate::layout::LayoutPlan;

pub type ListenerId = usize;

/// Change notification delivered to every subscribed listener after an
/// effective mutation. No-op calls do not notify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    Opened(WindowId),
    Closed(WindowId),
    Focused(WindowId),
    StateChanged { id: WindowId, state: WindowState },
    GeometryChanged(WindowId),
    TitleChanged(WindowId),
}

/// Initial contents handed to [`WindowRegistry::from_seed`], usually produced
/// by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySeed {
    pub windows: Vec<WindowRecord>,
    pub focused: Option<WindowId>,
    pub z_counter: u64,
    pub next_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("focused window {0} is not registered")]
    DanglingFocus(WindowId),
    #[error("windows {a} and {b} share z-index {z}")]
    SharedZIndex { a: WindowId, b: WindowId, z: u64 },
    #[error("window {id} has z-index {z} above the counter {counter}")]
    ZAboveCounter { id: WindowId, z: u64, counter: u64 },
    #[error("window {id} has an unclamped rectangle {rect:?}")]
    Unclamped { id: WindowId, rect: Rect },
    #[error("window {id} is {state} but previous geometry presence is {present}")]
    PreviousGeometry {
        id: WindowId,
        state: WindowState,
        present: bool,
    },
}

/// Authoritative model of every window's geometry and lifecycle state.
///
/// The registry is owned by the host's event loop; the command surface and the
/// interaction controllers are its only writers. Every public mutator
/// validates its preconditions and silently does nothing when they fail,
/// because window actions are routinely fired against state that changed
/// underneath the user (a shortcut against a window that just closed).
pub struct WindowRegistry {
    windows: BTreeMap<WindowId, WindowRecord>,
    focused: Option<WindowId>,
    z_counter: u64,
    next_id: u64,
    viewport: Size,
    constraints: ClampConstraints,
    cascade_step: i32,
    listeners: Vec<(ListenerId, Box<dyn FnMut(&RegistryEvent)>)>,
    next_listener: ListenerId,
    revision: u64,
}

impl fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("windows", &self.windows)
            .field("focused", &self.focused)
            .field("z_counter", &self.z_counter)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl WindowRegistry {
    pub fn new(viewport: Size) -> Self {
        Self {
            windows: BTreeMap::new(),
            focused: None,
            z_counter: 0,
            next_id: 1,
            viewport,
            constraints: ClampConstraints::default(),
            cascade_step: CASCADE_STEP,
            listeners: Vec::new(),
            next_listener: 0,
            revision: 0,
        }
    }

    /// Rebuild a registry from persisted state. Interactions are dropped and
    /// every rectangle is re-clamped against `viewport`.
    pub fn from_seed(seed: RegistrySeed, viewport: Size) -> Self {
        let mut registry = Self::new(viewport);
        registry.load_seed(seed);
        registry
    }

    fn load_seed(&mut self, seed: RegistrySeed) {
        let mut max_id = 0;
        let mut max_z = seed.z_counter.min(MAX_PERSISTED_COUNTER);
        for mut record in seed.windows {
            let out_of_range =
                record.id.get() > MAX_PERSISTED_COUNTER || record.z_index > MAX_PERSISTED_COUNTER;
            if out_of_range {
                tracing::warn!(
                    window_id = %record.id,
                    z = record.z_index,
                    "dropping seed window with out-of-range counters"
                );
                continue;
            }
            record.interaction = None;
            max_id = max_id.max(record.id.get());
            max_z = max_z.max(record.z_index);
            self.windows.insert(record.id, record);
        }
        self.next_id = seed
            .next_id
            .min(MAX_PERSISTED_COUNTER + 1)
            .max(max_id + 1)
            .max(1);
        self.z_counter = max_z;
        self.focused = seed.focused.filter(|id| self.windows.contains_key(id));
        self.refit_all();
        self.debug_check();
    }

    /// Replace the clamp constraints and re-fit every window to them.
    pub fn with_constraints(mut self, constraints: ClampConstraints) -> Self {
        self.constraints = constraints;
        self.refit_all();
        self
    }

    pub fn with_cascade_step(mut self, step: i32) -> Self {
        self.cascade_step = step;
        self
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn constraints(&self) -> ClampConstraints {
        self.constraints
    }

    pub fn z_counter(&self) -> u64 {
        self.z_counter
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Monotonic counter bumped on every effective mutation; hosts compare it
    /// to decide whether a save is due.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.get(&id)
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    pub fn is_focused(&self, id: WindowId) -> bool {
        self.focused == Some(id)
    }

    /// All windows ordered by ascending z-index (back to front).
    pub fn windows(&self) -> Vec<&WindowRecord> {
        let mut list: Vec<&WindowRecord> = self.windows.values().collect();
        list.sort_by_key(|w| (w.z_index, w.id));
        list
    }

    /// Owned copy of [`Self::windows`] for layout algorithms.
    pub fn snapshot(&self) -> Vec<WindowRecord> {
        self.windows().into_iter().cloned().collect()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&RegistryEvent) + 'static,
    {
        let id = self.next_listener;
        self.next_listener = self.next_listener.saturating_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: RegistryEvent) {
        self.revision = self.revision.wrapping_add(1);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn clamp(&self, rect: Rect) -> Rect {
        let clamped = clamp_rect(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            &self.constraints,
            self.viewport,
        );
        Rect::from_parts(clamp_position(clamped.position(), self.viewport), clamped.size())
    }

    fn full_viewport(&self) -> Rect {
        Rect::from_parts(Point::default(), self.viewport)
    }

    pub fn open(
        &mut self,
        app_id: impl Into<String>,
        title: impl Into<String>,
        config: WindowConfig,
    ) -> WindowId {
        let app_id = app_id.into();
        let id = WindowId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let position = config.position.unwrap_or_else(|| {
            let siblings = self.windows.values().filter(|w| w.app_id == app_id).count();
            cascade_offset(siblings, self.cascade_step)
        });
        let rect = self.clamp(Rect::from_parts(position, config.size));
        tracing::debug!(window_id = %id, app_id = %app_id, ?rect, "opened window");
        self.windows.insert(
            id,
            WindowRecord {
                id,
                app_id,
                title: title.into(),
                position: rect.position(),
                size: rect.size(),
                z_index: 0,
                state: WindowState::Normal,
                previous_geometry: None,
                capabilities: config.capabilities,
                interaction: None,
            },
        );
        self.notify(RegistryEvent::Opened(id));
        self.focus(id);
        match config.state {
            WindowState::Maximized => self.maximize(id),
            WindowState::Minimized => self.minimize(id),
            WindowState::Normal => {}
        }
        id
    }

    pub fn close(&mut self, id: WindowId) {
        let Some(window) = self.windows.get(&id) else {
            tracing::trace!(window_id = %id, "close ignored: unknown window");
            return;
        };
        if !window.capabilities.closeable {
            tracing::trace!(window_id = %id, "close ignored: not closeable");
            return;
        }
        self.windows.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        tracing::debug!(window_id = %id, "closed window");
        self.notify(RegistryEvent::Closed(id));
        self.debug_check();
    }

    /// Raise and focus a window. Focusing a minimized window also restores it.
    pub fn focus(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(&id) else {
            tracing::trace!(window_id = %id, "focus ignored: unknown window");
            return;
        };
        self.z_counter = self.z_counter.saturating_add(1);
        window.z_index = self.z_counter;
        let unminimized = window.state == WindowState::Minimized;
        if unminimized {
            window.state = WindowState::Normal;
        }
        self.focused = Some(id);
        tracing::trace!(window_id = %id, z = self.z_counter, "focused window");
        if unminimized {
            self.notify(RegistryEvent::StateChanged {
                id,
                state: WindowState::Normal,
            });
        }
        self.notify(RegistryEvent::Focused(id));
        self.debug_check();
    }

    pub fn bring_to_front(&mut self, id: WindowId) {
        self.focus(id);
    }

    /// Minimize a window. A maximized window is first returned to its saved
    /// geometry so the states stay mutually exclusive.
    pub fn minimize(&mut self, id: WindowId) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        if !window.capabilities.minimizable || window.is_minimized() {
            tracing::trace!(window_id = %id, "minimize ignored");
            return;
        }
        if window.is_maximized() {
            self.restore_from_maximize(id);
        }
        if let Some(window) = self.windows.get_mut(&id) {
            window.state = WindowState::Minimized;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        tracing::debug!(window_id = %id, "minimized window");
        self.notify(RegistryEvent::StateChanged {
            id,
            state: WindowState::Minimized,
        });
        self.debug_check();
    }

    pub fn restore(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.state == WindowState::Minimized {
            window.state = WindowState::Normal;
            self.notify(RegistryEvent::StateChanged {
                id,
                state: WindowState::Normal,
            });
        }
        self.focus(id);
    }

    pub fn maximize(&mut self, id: WindowId) {
        let full = self.full_viewport();
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if !window.capabilities.maximizable || window.is_maximized() {
            tracing::trace!(window_id = %id, "maximize ignored");
            return;
        }
        window.previous_geometry = Some(window.rect());
        window.state = WindowState::Maximized;
        window.position = full.position();
        window.size = full.size();
        tracing::debug!(window_id = %id, "maximized window");
        self.notify(RegistryEvent::StateChanged {
            id,
            state: WindowState::Maximized,
        });
        self.notify(RegistryEvent::GeometryChanged(id));
        self.debug_check();
    }

    pub fn restore_from_maximize(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if !window.is_maximized() {
            return;
        }
        let Some(previous) = window.previous_geometry.take() else {
            return;
        };
        window.position = previous.position();
        window.size = previous.size();
        window.state = WindowState::Normal;
        tracing::debug!(window_id = %id, rect = ?previous, "restored window from maximize");
        self.notify(RegistryEvent::StateChanged {
            id,
            state: WindowState::Normal,
        });
        self.notify(RegistryEvent::GeometryChanged(id));
        self.debug_check();
    }

    pub fn toggle_maximize(&mut self, id: WindowId) {
        match self.windows.get(&id).map(|w| w.state) {
            Some(WindowState::Maximized) => self.restore_from_maximize(id),
            Some(_) => self.maximize(id),
            None => {}
        }
    }

    /// Move a window's origin. Maximized windows are not movable.
    pub fn move_to(&mut self, id: WindowId, x: i32, y: i32) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        if window.is_maximized() {
            tracing::trace!(window_id = %id, "move ignored: maximized");
            return;
        }
        let rect = self.clamp(Rect::from_parts(Point::new(x, y), window.size));
        self.write_rect(id, rect);
    }

    pub fn resize(&mut self, id: WindowId, width: i32, height: i32) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        if window.is_maximized() || !window.capabilities.resizable {
            tracing::trace!(window_id = %id, "resize ignored");
            return;
        }
        let rect = self.clamp(Rect::from_parts(window.position, Size::new(width, height)));
        self.write_rect(id, rect);
    }

    /// Move and resize in one write. Non-resizable windows keep their size.
    pub fn set_rect(&mut self, id: WindowId, rect: Rect) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        if window.is_maximized() {
            return;
        }
        let size = if window.capabilities.resizable {
            rect.size()
        } else {
            window.size
        };
        let rect = self.clamp(Rect::from_parts(rect.position(), size));
        self.write_rect(id, rect);
    }

    fn write_rect(&mut self, id: WindowId, rect: Rect) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.rect() == rect {
            return;
        }
        window.position = rect.position();
        window.size = rect.size();
        tracing::trace!(window_id = %id, ?rect, "geometry changed");
        self.notify(RegistryEvent::GeometryChanged(id));
        self.debug_check();
    }

    /// Apply the deltas produced by a layout algorithm through the regular
    /// mutators so clamping still holds.
    pub fn apply_layout(&mut self, plan: &LayoutPlan) {
        for (&id, delta) in plan {
            match (delta.position, delta.size) {
                (Some(position), Some(size)) => {
                    self.set_rect(id, Rect::from_parts(position, size))
                }
                (Some(position), None) => self.move_to(id, position.x, position.y),
                (None, Some(size)) => self.resize(id, size.width, size.height),
                (None, None) => {}
            }
        }
    }

    pub fn set_title(&mut self, id: WindowId, title: impl Into<String>) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        let title = title.into();
        if window.title == title {
            return;
        }
        window.title = title;
        self.notify(RegistryEvent::TitleChanged(id));
    }

    /// React to a surface resize: normal and minimized windows are re-clamped,
    /// maximized windows are refitted and their saved geometry re-clamped.
    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport == viewport {
            return;
        }
        tracing::debug!(?viewport, "viewport changed");
        self.viewport = viewport;
        let changed = self.refit_all();
        for id in changed {
            self.notify(RegistryEvent::GeometryChanged(id));
        }
        self.debug_check();
    }

    fn refit_all(&mut self) -> Vec<WindowId> {
        let full = self.full_viewport();
        let mut changed = Vec::new();
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            let Some(window) = self.windows.get(&id) else {
                continue;
            };
            let (rect, previous) = if window.is_maximized() {
                (full, window.previous_geometry.map(|p| self.clamp(p)))
            } else {
                (self.clamp(window.rect()), None)
            };
            if let Some(window) = self.windows.get_mut(&id) {
                if window.rect() != rect {
                    window.position = rect.position();
                    window.size = rect.size();
                    changed.push(id);
                }
                if previous.is_some() {
                    window.previous_geometry = previous;
                }
            }
        }
        changed
    }

    pub fn begin_interaction(&mut self, id: WindowId, interaction: Interaction) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.interaction = Some(interaction);
        }
    }

    pub fn end_interaction(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.interaction = None;
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(id) = self.focused
            && !self.windows.contains_key(&id)
        {
            return Err(InvariantViolation::DanglingFocus(id));
        }
        let mut seen: BTreeMap<u64, WindowId> = BTreeMap::new();
        for window in self.windows.values() {
            if window.z_index > self.z_counter {
                return Err(InvariantViolation::ZAboveCounter {
                    id: window.id,
                    z: window.z_index,
                    counter: self.z_counter,
                });
            }
            if let Some(&other) = seen.get(&window.z_index) {
                return Err(InvariantViolation::SharedZIndex {
                    a: other,
                    b: window.id,
                    z: window.z_index,
                });
            }
            seen.insert(window.z_index, window.id);
            if window.is_normal() && self.clamp(window.rect()) != window.rect() {
                return Err(InvariantViolation::Unclamped {
                    id: window.id,
                    rect: window.rect(),
                });
            }
            if window.previous_geometry.is_some() != window.is_maximized() {
                return Err(InvariantViolation::PreviousGeometry {
                    id: window.id,
                    state: window.state,
                    present: window.previous_geometry.is_some(),
                });
            }
        }
        Ok(())
    }

    fn debug_check(&self) {
        if let Err(violation) = self.check_invariants() {
            debug_assert!(false, "window registry invariant violated: {violation}");
            tracing::error!(%violation, "window registry invariant violated");
        }
    }
}
