//! SVG writing operations for the rendered choropleth.

use std::io::Write;

use anyhow::{Context, Result};
use geo::Rect;

/// String-based SVG writer for in-memory output.
pub(crate) struct SvgStringWriter {
    buffer: Vec<u8>,
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgStringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        std::io::Result::Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::Result::Ok(())
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.buffer.extend_from_slice(buf);
        std::io::Result::Ok(())
    }
}

impl SvgStringWriter {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Get the SVG string
    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer).context("[render] SVG output is not valid UTF-8")
    }
}

/// Write the SVG header, including the XML declaration and opening <svg> tag.
/// The output keeps the asset's coordinate system through the viewBox; the
/// width/height attributes scale it for display.
pub(crate) fn write_svg_header<W: Write>(
    writer: &mut W,
    width: f64,
    height: f64,
    view_box: &Rect<f64>,
) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(
        writer,
        r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width:.0}" height="{height:.0}"
        viewBox="{min_x} {min_y} {vb_w} {vb_h}">"##,
        min_x = view_box.min().x,
        min_y = view_box.min().y,
        vb_w = view_box.width(),
        vb_h = view_box.height(),
    )?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write SVG styles for map shapes.
pub(crate) fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        r##"<defs>
<style>
    .region {{ stroke: #ffffff; stroke-width: 0.5; }}
    .region.hl {{ stroke: #103a7b; stroke-width: 3; filter: url(#hl-glow); }}
</style>
<filter id="hl-glow" x="-20%" y="-20%" width="140%" height="140%">
    <feDropShadow dx="0" dy="0" stdDeviation="4" flood-color="#103a7b" flood-opacity="0.6"/>
</filter>
</defs>"##
    )?;
    Ok(())
}

/// Write the closing </svg> tag.
pub(crate) fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}
