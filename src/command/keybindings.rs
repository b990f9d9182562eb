use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    /// Terminals disagree on whether BackTab carries SHIFT, so it is ignored
    /// for that key.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let mods = if key.code == KeyCode::BackTab {
            key.modifiers - KeyModifiers::SHIFT
        } else {
            key.modifiers
        };
        key.code == self.code && mods == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Intent, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Intent::*;
        let mut kb = Self::new();
        kb.add(CycleFocusForward, KeyCombo::alt(KeyCode::Tab));
        kb.add(CycleFocusBackward, KeyCombo::alt(KeyCode::BackTab));
        kb.add(CloseFocused, KeyCombo::alt(KeyCode::Char('w')));
        kb.add(CloseFocused, KeyCombo::alt(KeyCode::F(4)));
        kb.add(MinimizeFocused, KeyCombo::alt(KeyCode::Char('m')));
        kb.add(ToggleMaximizeFocused, KeyCombo::alt(KeyCode::Up));
        kb.add(SnapFocusedLeft, KeyCombo::alt(KeyCode::Left));
        kb.add(SnapFocusedRight, KeyCombo::alt(KeyCode::Right));
        kb.add(CascadeAll, KeyCombo::alt(KeyCode::Char('c')));
        kb.add(TileAll, KeyCombo::alt(KeyCode::Char('t')));
        kb.add(TileHorizontal, KeyCombo::alt(KeyCode::Char('h')));
        kb.add(TileVertical, KeyCombo::alt(KeyCode::Char('v')));
        kb.add(Deselect, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb
    }
}

impl KeyBindings {
    /// Empty table; see [`KeyBindings::default`] for the stock shortcuts.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, intent: Intent, combo: KeyCombo) {
        self.map.entry(intent).or_default().push(combo);
    }

    /// Drop every combo bound to `intent`.
    pub fn clear(&mut self, intent: Intent) {
        self.map.remove(&intent);
    }

    pub fn matches(&self, intent: Intent, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&intent) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// First intent (in declaration order) bound to `key`.
    pub fn intent_for_key(&self, key: &KeyEvent) -> Option<Intent> {
        Intent::ALL
            .into_iter()
            .find(|intent| self.matches(*intent, key))
    }

    pub fn help_entries(&self) -> Vec<(Intent, Vec<String>)> {
        Intent::ALL
            .into_iter()
            .filter_map(|intent| {
                let combos = self.combos_for(intent);
                (!combos.is_empty()).then_some((intent, combos))
            })
            .collect()
    }

    /// Return the display strings for all combos mapped to `intent`.
    pub fn combos_for(&self, intent: Intent) -> Vec<String> {
        self.map
            .get(&intent)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    pub fn first_combo(&self, intent: Intent) -> Option<KeyCombo> {
        self.map.get(&intent).and_then(|list| list.first().cloned())
    }
}
