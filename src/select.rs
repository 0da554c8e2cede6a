//! Selection state: one highlighted region shared by the map and the ranked
//! list, with tooltip placement in screen coordinates.

use std::collections::HashMap;

use geo::{Coord, Rect};

use crate::render::MapRenderer;
use crate::types::{ResolvedRegion, ShapeId};

/// Horizontal offset between the anchor point and the tooltip.
const TOOLTIP_OFFSET_X: f64 = 15.0;

/// Nominal tooltip width used for right-edge clamping.
const TOOLTIP_WIDTH: f64 = 250.0;

/// Anchors closer than this to the top edge open the tooltip below the
/// anchor instead of above it.
const FLIP_MARGIN: f64 = 100.0;

/// Uniform scale plus translation from map (asset viewBox) coordinates to
/// screen coordinates: the asset fitted into a viewport, aspect preserved
/// and centered.
#[derive(Debug, Clone, Copy)]
pub struct ScreenTransform {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

impl ScreenTransform {
    /// Fit a viewBox into a `width x height` viewport.
    pub fn fit(view_box: Rect<f64>, width: f64, height: f64) -> Self {
        let scale = (width / view_box.width()).min(height / view_box.height());
        let translate_x = (width - view_box.width() * scale) / 2.0 - view_box.min().x * scale;
        let translate_y = (height - view_box.height() * scale) / 2.0 - view_box.min().y * scale;
        Self { scale, translate_x, translate_y }
    }

    /// Map-space point to screen coordinates.
    #[inline]
    pub fn apply(&self, p: Coord<f64>) -> (f64, f64) {
        (p.x * self.scale + self.translate_x, p.y * self.scale + self.translate_y)
    }
}

/// The single active selection. Exclusively owned by the coordinator; the
/// renderer and the list only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub shape_id: ShapeId,
    pub region_name: String,
    pub total: f64,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Where the tooltip opens relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// Computed tooltip position for the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    pub placement: Placement,
}

/// A pointer activation on the rendering surface, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Activation of a shape, with the pointer position.
    Shape(ShapeId, f64, f64),
    /// Activation outside both the map surface and the list.
    Outside,
}

/// Owns the "currently highlighted region" state and keeps the ranked list
/// and the map mutually consistent.
///
/// Two states: Idle (no selection) and Active. Activating another shape
/// replaces the selection atomically; `clear` (the tooltip close control or
/// an outside activation) returns to Idle. At all times at most one shape is
/// rendered highlighted, and it is exactly the one named by the current
/// selection.
pub struct SelectionCoordinator {
    /// Reverse lookup shape id -> (display name, total) over the resolved
    /// set. When several samples share a shape the later one wins, matching
    /// the intensity map.
    by_shape: HashMap<ShapeId, (String, f64)>,
    /// Display-name lookup for list-item activation (uppercased, trimmed).
    by_name: HashMap<String, ShapeId>,
    /// Local-to-screen transform of the rendering surface; `None` until the
    /// surface is mounted.
    transform: Option<ScreenTransform>,
    viewport_width: f64,
    selection: Option<SelectionState>,
}

impl SelectionCoordinator {
    pub fn new(resolved: &[ResolvedRegion]) -> Self {
        let mut by_shape = HashMap::new();
        let mut by_name = HashMap::new();
        for region in resolved {
            by_shape.insert(
                region.shape_id.clone(),
                (region.sample.name.clone(), region.sample.total),
            );
            by_name.insert(
                region.sample.name.trim().to_uppercase(),
                region.shape_id.clone(),
            );
        }
        Self {
            by_shape,
            by_name,
            transform: None,
            viewport_width: 0.0,
            selection: None,
        }
    }

    /// Signal that the rendering surface is laid out. Until this is called,
    /// selections that need the surface's coordinate transform are dropped.
    pub fn mount(&mut self, transform: ScreenTransform, viewport_width: f64) {
        self.transform = Some(transform);
        self.viewport_width = viewport_width;
    }

    /// Drop the surface transform (component teardown). The selection is
    /// cleared with it.
    pub fn unmount(&mut self, renderer: &mut MapRenderer) {
        self.transform = None;
        self.clear(renderer);
    }

    #[inline]
    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    /// Route a pointer activation from the map surface.
    pub fn handle_pointer(&mut self, renderer: &mut MapRenderer, event: PointerEvent) {
        match event {
            PointerEvent::Shape(id, x, y) => {
                self.select_by_shape_id(renderer, &id, Some((x, y)));
            }
            PointerEvent::Outside => self.clear(renderer),
        }
    }

    /// Select a shape, anchoring the tooltip at the pointer position when
    /// one is given, or at the shape's geometric center otherwise.
    ///
    /// No-ops (leaving the previous state untouched) when the shape has no
    /// resolved sample, or when no pointer position is given and the surface
    /// is not mounted.
    pub fn select_by_shape_id(
        &mut self,
        renderer: &mut MapRenderer,
        id: &ShapeId,
        pointer: Option<(f64, f64)>,
    ) {
        let Some((name, total)) = self.by_shape.get(id).cloned() else {
            return;
        };

        let anchor = match pointer {
            Some(at) => at,
            None => {
                // Locate the shape's center on the rendered surface.
                let Some(transform) = self.transform else { return };
                let Some(shape) = renderer.asset().get(id) else { return };
                transform.apply(shape.centroid())
            }
        };

        // Active -> Active replaces atomically; there is no intermediate
        // Idle state.
        self.selection = Some(SelectionState {
            shape_id: id.clone(),
            region_name: name,
            total,
            screen_x: anchor.0,
            screen_y: anchor.1,
        });
        renderer.set_highlight(Some(id.clone()));
    }

    /// Select from a ranked-list activation by region display name.
    pub fn select_by_region_name(&mut self, renderer: &mut MapRenderer, name: &str) {
        let Some(id) = self.by_name.get(&name.trim().to_uppercase()).cloned() else {
            return;
        };
        self.select_by_shape_id(renderer, &id, None);
    }

    /// Explicit close, or an activation outside both surfaces.
    pub fn clear(&mut self, renderer: &mut MapRenderer) {
        self.selection = None;
        renderer.set_highlight(None);
    }

    /// Tooltip placement for the active selection: offset right of the
    /// anchor, clamped to the viewport's right edge; opens below the anchor
    /// near the top edge, above it otherwise.
    pub fn tooltip(&self) -> Option<Tooltip> {
        let sel = self.selection.as_ref()?;
        let left = (sel.screen_x + TOOLTIP_OFFSET_X).min(self.viewport_width - TOOLTIP_WIDTH);
        let top = (sel.screen_y - 10.0).max(10.0);
        let placement = if sel.screen_y < FLIP_MARGIN {
            Placement::Below
        } else {
            Placement::Above
        };
        Some(Tooltip { left, top, placement })
    }
}
