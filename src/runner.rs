//! Interactive terminal desktop built on the engine.
//!
//! [`DesktopApp`] owns a registry and the gesture controllers, translates
//! crossterm input into engine calls and paints the result. [`run`] wires it
//! to an input driver, an output driver and the [`EventLoop`].

use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::prelude::Rect as Area;
use ratatui::style::{Color, Modifier, Style};

use crate::command::{
    CommandSurface, InputTarget, Intent, KeyBindings, TaskbarEntry, taskbar_click,
};
use crate::config::EngineConfig;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop, Pulse};
use crate::geometry::{Rect, Size};
use crate::interaction::{DragController, HitTarget, PointerEvent, PointerHub, ResizeController};
use crate::persistence::{self, LayoutStore};
use crate::surface::CellGrid;
use crate::window::decorator::{
    Chrome, FramePart, OpenStepDecorator, TitleControl, WindowDecorator, write_clipped,
};
use crate::window::{WindowConfig, WindowId, WindowRegistry, WindowState};

/// Widest label a taskbar button gets, padding included.
const TASKBAR_LABEL_WIDTH: usize = 20;

const TASKBAR_HINT: &str = "Ctrl+N new  Ctrl+Q quit ";

/// One clickable taskbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarSlot {
    pub id: WindowId,
    pub x: u16,
    pub width: u16,
    pub label: String,
}

/// Lay taskbar buttons out left to right; buttons that do not fit are left
/// off.
pub fn taskbar_slots(entries: &[TaskbarEntry], width: u16) -> Vec<TaskbarSlot> {
    let mut slots = Vec::new();
    let mut x: u16 = 0;
    for entry in entries {
        let mut label: String = format!(" {}:{}", entry.id, entry.title)
            .chars()
            .take(TASKBAR_LABEL_WIDTH - 1)
            .collect();
        label.push(' ');
        let w = label.chars().count() as u16;
        if x.saturating_add(w) > width {
            break;
        }
        slots.push(TaskbarSlot {
            id: entry.id,
            x,
            width: w,
            label,
        });
        x += w + 1;
    }
    slots
}

pub struct DesktopApp {
    registry: WindowRegistry,
    commands: CommandSurface,
    drag: DragController,
    resize: ResizeController,
    hub: PointerHub,
    grid: CellGrid,
    fixed_viewport: Option<Size>,
    decorator: Box<dyn WindowDecorator>,
    store: Box<dyn LayoutStore>,
    storage_key: String,
    saved_revision: u64,
}

impl DesktopApp {
    /// Restore the layout stored under `storage_key` and size the desktop for
    /// a terminal of `cols` by `rows`.
    pub fn new(
        config: &EngineConfig,
        store: Box<dyn LayoutStore>,
        storage_key: impl Into<String>,
        cols: u16,
        rows: u16,
    ) -> Self {
        let storage_key = storage_key.into();
        let grid = grid_for(config.viewport, cols, rows);
        let seed = persistence::restore_or_default(store.as_ref(), &storage_key);
        let registry = config.registry(seed, grid.viewport);
        let saved_revision = registry.revision();
        tracing::info!(
            windows = registry.len(),
            cols,
            rows,
            viewport_width = grid.viewport.width,
            viewport_height = grid.viewport.height,
            "desktop ready"
        );
        Self {
            registry,
            commands: CommandSurface::new(KeyBindings::default(), config.layout_options()),
            drag: DragController::new(config.drag_options()),
            resize: ResizeController::new(),
            hub: PointerHub::new(),
            grid,
            fixed_viewport: config.viewport,
            decorator: Box::new(OpenStepDecorator),
            store,
            storage_key,
            saved_revision,
        }
    }

    pub fn with_decorator(mut self, decorator: Box<dyn WindowDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WindowRegistry {
        &mut self.registry
    }

    pub fn grid(&self) -> CellGrid {
        self.grid
    }

    pub fn store(&self) -> &dyn LayoutStore {
        self.store.as_ref()
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let flow = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                ControlFlow::Continue
            }
            Event::Resize(cols, rows) => {
                self.resize_terminal(*cols, *rows);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.drag.pump(&mut self.registry);
        self.resize.pump(&mut self.registry);
        flow
    }

    /// Commit coalesced gesture writes and persist once nothing is in flight.
    pub fn on_frame(&mut self) {
        self.drag.on_frame(&mut self.registry);
        self.resize.on_frame(&mut self.registry);
        if !self.drag.is_active() && !self.resize.is_active() {
            self.persist_if_changed();
        }
    }

    /// Final save before the desktop goes away.
    pub fn shutdown(&mut self) {
        self.drag.cancel(&mut self.registry);
        self.resize.cancel(&mut self.registry);
        self.persist_if_changed();
    }

    fn persist_if_changed(&mut self) {
        let revision = self.registry.revision();
        if revision == self.saved_revision {
            return;
        }
        // A failed save is logged inside `save`; retrying every frame would
        // only repeat the warning.
        let _ = persistence::save(self.store.as_mut(), &self.storage_key, &self.registry);
        self.saved_revision = revision;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => return ControlFlow::Quit,
                KeyCode::Char('n') => {
                    self.open_scratch_window();
                    return ControlFlow::Continue;
                }
                _ => {}
            }
        }
        if let Some(Intent::Deselect) =
            self.commands
                .handle_key(key, InputTarget::Desktop, &mut self.registry)
        {
            tracing::trace!("nothing to deselect on the desktop");
        }
        ControlFlow::Continue
    }

    fn open_scratch_window(&mut self) {
        let title = format!("Window {}", self.registry.next_id());
        let min = self.registry.constraints().min;
        let viewport = self.grid.viewport;
        let config = WindowConfig {
            size: Size::new(
                min.width.max(viewport.width / 2),
                min.height.max(viewport.height / 2),
            ),
            ..Default::default()
        };
        self.registry.open("scratch", title, config);
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let point = self.grid.to_pixel(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(mouse.column, mouse.row),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.hub.dispatch(&PointerEvent::moved(point.x, point.y));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.hub.dispatch(&PointerEvent::release(point.x, point.y));
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, col: u16, row: u16) {
        if row >= self.grid.rows {
            let entries = self.registry.taskbar_entries();
            if let Some(slot) = taskbar_slots(&entries, self.grid.cols)
                .into_iter()
                .find(|slot| (slot.x..slot.x + slot.width).contains(&col))
            {
                let action = taskbar_click(&mut self.registry, slot.id);
                tracing::debug!(window_id = %slot.id, ?action, "taskbar click");
            }
            return;
        }

        let (col, row) = (col as i32, row as i32);
        let Some((id, part)) = self.frame_part_at(col, row) else {
            return;
        };
        let point = self.grid.to_pixel(col as u16, row as u16);
        let press = PointerEvent::press(point.x, point.y);
        match part {
            FramePart::Control(TitleControl::Minimize) => self.registry.minimize(id),
            FramePart::Control(TitleControl::Maximize) => self.registry.toggle_maximize(id),
            FramePart::Control(TitleControl::Close) => self.registry.close(id),
            FramePart::TitleBar => {
                let target = HitTarget::TitleBar;
                if !self.drag.press(&mut self.registry, &self.hub, id, target, &press) {
                    self.registry.focus(id);
                }
            }
            FramePart::Handle(handle) => {
                let target = HitTarget::Handle(handle);
                if !self.resize.press(&mut self.registry, &self.hub, id, target, &press) {
                    self.registry.focus(id);
                }
            }
            FramePart::Body => self.registry.focus(id),
        }
    }

    /// Topmost visible window under a cell and the part of its frame hit.
    fn frame_part_at(&self, col: i32, row: i32) -> Option<(WindowId, FramePart)> {
        self.registry
            .windows()
            .into_iter()
            .rev()
            .filter(|w| !w.is_minimized())
            .find_map(|w| {
                let chrome = Chrome::of(w, self.registry.is_focused(w.id));
                self.decorator
                    .hit(self.grid.to_cells(w.rect()), &chrome, col, row)
                    .map(|part| (w.id, part))
            })
    }

    fn resize_terminal(&mut self, cols: u16, rows: u16) {
        self.grid = grid_for(self.fixed_viewport, cols, rows);
        if self.fixed_viewport.is_none() {
            self.registry.set_viewport(self.grid.viewport);
        }
        tracing::debug!(cols, rows, "terminal resized");
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let desktop = Area::new(area.x, area.y, area.width, self.grid.rows.min(area.height));
        let buffer = frame.buffer_mut();

        for window in self.registry.windows() {
            if window.is_minimized() {
                continue;
            }
            let cells = self.grid.to_cells(window.rect());
            let chrome = Chrome::of(window, self.registry.is_focused(window.id));
            self.decorator.render_window(buffer, cells, desktop, &chrome);
            self.render_body(buffer, cells, desktop, window.id);
        }

        if area.height > desktop.height {
            let bar = Area::new(area.x, area.y + desktop.height, area.width, 1);
            self.render_taskbar(buffer, bar);
        }
    }

    fn render_body(&self, buffer: &mut Buffer, cells: Rect, bounds: Area, id: WindowId) {
        let Some(window) = self.registry.get(id) else {
            return;
        };
        let body = self.decorator.body(cells);
        let lines = [
            window.app_id.clone(),
            format!("#{} {}", window.id, window.state),
            format!(
                "{}x{} at {},{}",
                window.size.width, window.size.height, window.position.x, window.position.y
            ),
        ];
        let style = Style::default().fg(Color::Gray);
        for (idx, line) in lines.iter().enumerate().take(body.height.max(0) as usize) {
            write_clipped(
                buffer,
                bounds,
                body.x + 1,
                body.y + idx as i32,
                line,
                body.width - 1,
                style,
            );
        }
    }

    fn render_taskbar(&self, buffer: &mut Buffer, bar: Area) {
        let base = Style::default().bg(Color::DarkGray).fg(Color::White);
        buffer.set_style(bar, base);
        let entries = self.registry.taskbar_entries();
        for slot in taskbar_slots(&entries, bar.width) {
            let Some(entry) = entries.iter().find(|e| e.id == slot.id) else {
                continue;
            };
            let style = match (entry.focused, entry.state) {
                (true, _) => base.bg(Color::Blue).add_modifier(Modifier::BOLD),
                (false, WindowState::Minimized) => base.add_modifier(Modifier::DIM),
                _ => base,
            };
            write_clipped(
                buffer,
                bar,
                (bar.x + slot.x) as i32,
                bar.y as i32,
                &slot.label,
                slot.width as i32,
                style,
            );
        }
        let hint_width = TASKBAR_HINT.chars().count() as u16;
        if bar.width > hint_width {
            write_clipped(
                buffer,
                bar,
                (bar.x + bar.width - hint_width) as i32,
                bar.y as i32,
                TASKBAR_HINT,
                hint_width as i32,
                base,
            );
        }
    }
}

fn grid_for(viewport: Option<Size>, cols: u16, rows: u16) -> CellGrid {
    match viewport {
        Some(viewport) => CellGrid::scaled(cols, rows, viewport),
        None => CellGrid::native(cols, rows),
    }
}

/// Drive `app` until the user quits. The layout is saved on the way out even
/// when the loop fails.
pub fn run<I, O>(
    app: &mut DesktopApp,
    input: I,
    output: &mut O,
    poll_interval: Duration,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    let result = event_loop.run(|pulse| match pulse {
        Pulse::Frame => {
            app.on_frame();
            output.draw(|frame| app.render(frame))?;
            Ok(ControlFlow::Continue)
        }
        Pulse::Input(event) => Ok(app.handle_event(&event)),
    });

    let _ = event_loop.driver().set_mouse_capture(false);
    app.shutdown();
    output.exit()?;
    result
}
