//! Declarative binding of intensities onto asset shapes.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use geo::Coord;
use tempfile::NamedTempFile;

use super::asset::{MapAsset, Outline};
use super::color::{intensity_color, Rgb, NO_DATA};
use super::svg::{write_svg_footer, write_svg_header, write_svg_styles, SvgStringWriter};
use crate::scale::IntensityMap;
use crate::types::ShapeId;

/// Renders the choropleth from a `shape id -> fill` mapping recomputed on
/// data change. The underlying shape geometry is parsed once and never
/// rebuilt; re-binding colors is idempotent.
///
/// The renderer does not own selection state: the highlighted shape is
/// driven externally by the selection coordinator, and at most one shape is
/// highlighted at a time.
pub struct MapRenderer {
    asset: MapAsset,
    fills: HashMap<ShapeId, Rgb>,
    highlighted: Option<ShapeId>,
}

impl MapRenderer {
    pub fn new(asset: MapAsset) -> Self {
        Self { asset, fills: HashMap::new(), highlighted: None }
    }

    #[inline]
    pub fn asset(&self) -> &MapAsset {
        &self.asset
    }

    /// Recompute every shape's fill from the intensity map. Shapes absent
    /// from the map keep the distinct "no data" base color at render time.
    pub fn bind(&mut self, intensities: &IntensityMap) {
        self.fills.clear();
        for (id, &value) in intensities {
            if self.asset.contains(id) {
                self.fills.insert(id.clone(), intensity_color(value));
            }
        }
    }

    /// Set or clear the highlighted shape. Driven by the selection
    /// coordinator; ids unknown to the asset clear the highlight.
    pub fn set_highlight(&mut self, id: Option<ShapeId>) {
        self.highlighted = id.filter(|id| self.asset.contains(id));
    }

    #[inline]
    pub fn highlighted(&self) -> Option<&ShapeId> {
        self.highlighted.as_ref()
    }

    /// Fill currently bound for a shape, or the no-data color.
    #[inline]
    pub fn fill_for(&self, id: &ShapeId) -> Rgb {
        self.fills.get(id).copied().unwrap_or(NO_DATA)
    }

    /// Pointer hit test in map coordinates, for shape-level activation
    /// events.
    pub fn shape_at(&self, point: Coord<f64>) -> Option<&ShapeId> {
        self.asset.shape_at(point).map(|s| &s.id)
    }

    /// Render the current binding to an SVG string.
    pub fn to_svg_string(&self, width: f64) -> Result<String> {
        let mut writer = SvgStringWriter::new();
        self.write_svg_to(&mut writer, width)?;
        writer.into_string()
    }

    /// Render to a file, atomically (write-then-rename), so a failed render
    /// never leaves a partial document behind.
    pub fn write_svg(&self, path: &Path, width: f64) -> Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
            .context("[render] failed to create temp file")?;

        self.write_svg_to(&mut tmp, width)?;
        tmp.flush().context("[render] failed to flush SVG output")?;
        tmp.persist(path)
            .with_context(|| format!("[render] failed to write {}", path.display()))?;
        Ok(())
    }

    fn write_svg_to<W: Write>(&self, writer: &mut W, width: f64) -> Result<()> {
        let view_box = self.asset.view_box();
        let height = width * view_box.height() / view_box.width();

        write_svg_header(writer, width, height, &view_box)?;
        write_svg_styles(writer)?;

        for shape in self.asset.shapes() {
            let fill = self.fill_for(&shape.id);
            let class = if self.highlighted.as_ref() == Some(&shape.id) {
                "region hl"
            } else {
                "region"
            };

            match &shape.outline {
                Outline::Path { d } => writeln!(
                    writer,
                    r#"<path id="{}" class="{class}" d="{d}" fill="{fill}"/>"#,
                    shape.id
                )?,
                Outline::Polygon { points } => writeln!(
                    writer,
                    r#"<polygon id="{}" class="{class}" points="{points}" fill="{fill}"/>"#,
                    shape.id
                )?,
                Outline::Circle { cx, cy, r } => writeln!(
                    writer,
                    r#"<circle id="{}" class="{class}" cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/>"#,
                    shape.id
                )?,
                Outline::Rect { x, y, width, height } => writeln!(
                    writer,
                    r#"<rect id="{}" class="{class}" x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}"/>"#,
                    shape.id
                )?,
                Outline::Ellipse { cx, cy, rx, ry } => writeln!(
                    writer,
                    r#"<ellipse id="{}" class="{class}" cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}" fill="{fill}"/>"#,
                    shape.id
                )?,
            }
        }

        write_svg_footer(writer)?;
        Ok(())
    }
}
