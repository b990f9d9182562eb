use crate::window::{WindowId, WindowRegistry, WindowState};

/// One button in the host's taskbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: WindowId,
    pub title: String,
    pub app_id: String,
    pub state: WindowState,
    pub focused: bool,
}

/// What a taskbar click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarAction {
    Restored,
    Minimized,
    Focused,
    Ignored,
}

impl WindowRegistry {
    /// Taskbar entries in opening order, minimized windows included.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        let focused = self.focused();
        let mut windows = self.windows();
        windows.sort_by_key(|w| w.id);
        windows
            .into_iter()
            .map(|w| TaskbarEntry {
                id: w.id,
                title: w.title.clone(),
                app_id: w.app_id.clone(),
                state: w.state,
                focused: focused == Some(w.id),
            })
            .collect()
    }
}

/// Restore a minimized window, minimize the focused one, focus anything else.
pub fn taskbar_click(registry: &mut WindowRegistry, id: WindowId) -> TaskbarAction {
    let Some(window) = registry.get(id) else {
        return TaskbarAction::Ignored;
    };
    if window.is_minimized() {
        registry.restore(id);
        TaskbarAction::Restored
    } else if registry.is_focused(id) {
        if !window.capabilities.minimizable {
            return TaskbarAction::Ignored;
        }
        registry.minimize(id);
        TaskbarAction::Minimized
    } else {
        registry.focus(id);
        TaskbarAction::Focused
    }
}
