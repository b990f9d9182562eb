//! Engine tuning loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CASCADE_STEP, EDGE_THRESHOLD, GRID_SIZE, MIN_HEIGHT, MIN_WIDTH, TILE_GUTTER, TILE_PADDING,
};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{ClampConstraints, Size, Viewport, viewport_size};
use crate::interaction::DragOptions;
use crate::layout::LayoutOptions;
use crate::window::{RegistrySeed, WindowRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Fixed viewport; when absent the surface decides.
    pub viewport: Option<Size>,
    pub min_size: Size,
    /// Inset applied by the on-screen clamp.
    pub padding: i32,
    pub edge_threshold: i32,
    pub grid_size: i32,
    pub cascade_step: i32,
    pub tile_padding: i32,
    pub tile_gutter: i32,
    pub drag_edge_snap: bool,
    pub half_snap_on_release: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: None,
            min_size: Size::new(MIN_WIDTH, MIN_HEIGHT),
            padding: 0,
            edge_threshold: EDGE_THRESHOLD,
            grid_size: GRID_SIZE,
            cascade_step: CASCADE_STEP,
            tile_padding: TILE_PADDING,
            tile_gutter: TILE_GUTTER,
            drag_edge_snap: true,
            half_snap_on_release: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// The configured viewport, else the surface's size (or its fallback).
    pub fn resolve_viewport(&self, surface: &dyn Viewport) -> Size {
        self.viewport.unwrap_or_else(|| viewport_size(surface))
    }

    pub fn constraints(&self) -> ClampConstraints {
        ClampConstraints {
            min: self.min_size,
            max: None,
            padding: self.padding,
        }
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            padding: self.tile_padding,
            gutter: self.tile_gutter,
            cascade_step: self.cascade_step,
            edge_threshold: self.edge_threshold,
        }
    }

    pub fn drag_options(&self) -> DragOptions {
        DragOptions {
            edge_snap: self.drag_edge_snap,
            half_snap_on_release: self.half_snap_on_release,
            threshold: self.edge_threshold,
        }
    }

    pub fn registry(&self, seed: RegistrySeed, viewport: Size) -> WindowRegistry {
        WindowRegistry::from_seed(seed, viewport)
            .with_constraints(self.constraints())
            .with_cascade_step(self.cascade_step)
    }
}

/// Parse `<width>x<height>`, e.g. `1280x720`.
pub fn parse_viewport(value: &str) -> EngineResult<Size> {
    let invalid = || EngineError::InvalidViewport(value.to_string());
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: i32 = w.trim().parse().map_err(|_| invalid())?;
    let height: i32 = h.trim().parse().map_err(|_| invalid())?;
    if width <= 0 || height <= 0 {
        return Err(invalid());
    }
    Ok(Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FixedViewport, NoSurface};
    use indoc::indoc;

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_json_overrides_selected_fields() {
        let config = EngineConfig::from_json(indoc! {r#"
            {
              "viewport": { "width": 1280, "height": 720 },
              "minSize": { "width": 200, "height": 120 },
              "halfSnapOnRelease": true,
              "tileGutter": 4,
              "somethingNew": 1
            }
        "#})
        .unwrap();
        assert_eq!(config.viewport, Some(Size::new(1280, 720)));
        assert_eq!(config.min_size, Size::new(200, 120));
        assert!(config.half_snap_on_release);
        assert!(config.drag_edge_snap);
        assert_eq!(config.layout_options().gutter, 4);
        assert_eq!(config.layout_options().padding, TILE_PADDING);
        assert_eq!(config.resolve_viewport(&NoSurface), Size::new(1280, 720));
    }

    #[test]
    fn viewport_falls_back_to_surface() {
        let config = EngineConfig::default();
        assert_eq!(
            config.resolve_viewport(&FixedViewport(Size::new(800, 600))),
            Size::new(800, 600)
        );
        assert_eq!(config.resolve_viewport(&NoSurface), Size::new(1920, 1080));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "cascadeStep": 45 }"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.cascade_step, 45);
        assert!(matches!(
            EngineConfig::load(&dir.path().join("missing.json")),
            Err(EngineError::Io(_))
        ));
    }

    #[test]
    fn registry_uses_configured_minimum() {
        let config = EngineConfig {
            min_size: Size::new(100, 100),
            ..Default::default()
        };
        let mut registry = config.registry(RegistrySeed::default(), Size::new(1920, 1080));
        let id = registry.open("app", "w", crate::window::WindowConfig::default());
        registry.resize(id, 120, 110);
        assert_eq!(registry.get(id).unwrap().size, Size::new(120, 110));
    }

    #[test]
    fn parses_viewports() {
        assert_eq!(parse_viewport("1280x720").unwrap(), Size::new(1280, 720));
        assert_eq!(parse_viewport(" 800 X 600 ").unwrap(), Size::new(800, 600));
        assert!(matches!(
            parse_viewport("wide"),
            Err(EngineError::InvalidViewport(_))
        ));
        assert!(parse_viewport("0x10").is_err());
    }
}
