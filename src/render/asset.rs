//! The vector map asset, parsed once into shapes addressable by id.
//!
//! Rendering never touches the original markup again: shapes are re-emitted
//! from this model with computed styles, instead of splicing attributes into
//! the serialized document.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::{Coord, Rect};
use regex::Regex;

use crate::types::ShapeId;

/// Geometry of one drawable element, kept verbatim for re-emission.
#[derive(Debug, Clone)]
pub enum Outline {
    Path { d: String },
    Polygon { points: String },
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
}

/// One addressable region shape: its id, outline, and derived geometry.
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: ShapeId,
    pub outline: Outline,
    pub bounds: Rect<f64>,
}

impl Shape {
    /// Geometric center of the shape's bounding box, in map coordinates.
    /// This is the tooltip anchor.
    #[inline]
    pub fn centroid(&self) -> Coord<f64> {
        self.bounds.center()
    }
}

/// The parsed vector map asset. Loaded once per process; the shape id
/// namespace here is the contract the alias table's shape ids conform to.
pub struct MapAsset {
    shapes: Vec<Shape>,
    index: HashMap<ShapeId, usize>,
    view_box: Rect<f64>,
    /// Ids of elements whose geometry could not be measured. Diagnostics,
    /// not failures.
    skipped: Vec<String>,
}

impl MapAsset {
    /// Parse an SVG document into addressable shapes.
    ///
    /// Every `path`/`polygon`/`circle`/`rect`/`ellipse` element carrying an
    /// `id` attribute becomes a shape. Elements with degenerate geometry are
    /// recorded in [`MapAsset::skipped`] and left out. Fails only when the
    /// document yields no shapes at all.
    pub fn from_svg_str(svg: &str) -> Result<Self> {
        let tag_re = Regex::new(r"(?is)<(path|polygon|circle|rect|ellipse)\b([^>]*?)/?>")
            .expect("static regex");
        let attr_re = Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*"([^"]*)""#)
            .expect("static regex");

        let mut shapes = Vec::new();
        let mut index = HashMap::new();
        let mut skipped = Vec::new();

        for caps in tag_re.captures_iter(svg) {
            let kind = caps[1].to_ascii_lowercase();
            let attrs = parse_attrs(&attr_re, &caps[2]);

            let Some(id) = attrs.get("id").filter(|id| !id.is_empty()) else {
                continue;
            };

            match shape_from_attrs(&kind, &attrs) {
                Some((outline, bounds)) => {
                    let shape_id = ShapeId::new(id);
                    index.insert(shape_id.clone(), shapes.len());
                    shapes.push(Shape { id: shape_id, outline, bounds });
                }
                None => skipped.push(id.to_string()),
            }
        }

        if shapes.is_empty() {
            bail!("[asset] no addressable shapes found in SVG document");
        }

        let view_box = parse_view_box(svg)
            .unwrap_or_else(|| union_bounds(shapes.iter().map(|s| s.bounds)));

        Ok(Self { shapes, index, view_box, skipped })
    }

    /// Read and parse an asset file.
    pub fn from_svg_file(path: &Path) -> Result<Self> {
        let svg = std::fs::read_to_string(path)
            .with_context(|| format!("[asset] failed to read {}", path.display()))?;
        Self::from_svg_str(&svg)
            .with_context(|| format!("[asset] failed to parse {}", path.display()))
    }

    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[inline]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.index.get(id).map(|&i| &self.shapes[i])
    }

    #[inline]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.index.contains_key(id)
    }

    /// Document viewBox, or the union of shape bounds when absent.
    #[inline]
    pub fn view_box(&self) -> Rect<f64> {
        self.view_box
    }

    #[inline]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Hit test a map-space point against shape bounding boxes. When several
    /// boxes overlap the smallest one wins, so enclosed shapes stay
    /// selectable.
    pub fn shape_at(&self, point: Coord<f64>) -> Option<&Shape> {
        self.shapes
            .iter()
            .filter(|s| rect_contains(&s.bounds, point))
            .min_by(|a, b| {
                let (aa, ab) = (rect_area(&a.bounds), rect_area(&b.bounds));
                aa.partial_cmp(&ab).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

fn rect_contains(rect: &Rect<f64>, p: Coord<f64>) -> bool {
    p.x >= rect.min().x && p.x <= rect.max().x && p.y >= rect.min().y && p.y <= rect.max().y
}

fn rect_area(rect: &Rect<f64>) -> f64 {
    rect.width() * rect.height()
}

fn union_bounds(rects: impl Iterator<Item = Rect<f64>>) -> Rect<f64> {
    let mut min = Coord { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    for r in rects {
        min.x = min.x.min(r.min().x);
        min.y = min.y.min(r.min().y);
        max.x = max.x.max(r.max().x);
        max.y = max.y.max(r.max().y);
    }
    Rect::new(min, max)
}

/// Attribute list of one element tag.
fn parse_attrs(attr_re: &Regex, tag_body: &str) -> HashMap<String, String> {
    attr_re
        .captures_iter(tag_body)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn shape_from_attrs(kind: &str, attrs: &HashMap<String, String>) -> Option<(Outline, Rect<f64>)> {
    let num = |key: &str| attrs.get(key).and_then(|v| v.trim().parse::<f64>().ok());

    match kind {
        "path" => {
            let d = attrs.get("d")?.clone();
            let bounds = points_bounds(&path_points(&d))?;
            Some((Outline::Path { d }, bounds))
        }
        "polygon" => {
            let points = attrs.get("points")?.clone();
            let bounds = points_bounds(&number_pairs(&points))?;
            Some((Outline::Polygon { points }, bounds))
        }
        "circle" => {
            let (cx, cy, r) = (num("cx")?, num("cy")?, num("r")?);
            (r > 0.0).then(|| {
                let bounds = Rect::new(
                    Coord { x: cx - r, y: cy - r },
                    Coord { x: cx + r, y: cy + r },
                );
                (Outline::Circle { cx, cy, r }, bounds)
            })
        }
        "rect" => {
            let (x, y) = (num("x").unwrap_or(0.0), num("y").unwrap_or(0.0));
            let (width, height) = (num("width")?, num("height")?);
            (width > 0.0 && height > 0.0).then(|| {
                let bounds = Rect::new(
                    Coord { x, y },
                    Coord { x: x + width, y: y + height },
                );
                (Outline::Rect { x, y, width, height }, bounds)
            })
        }
        "ellipse" => {
            let (cx, cy, rx, ry) = (num("cx")?, num("cy")?, num("rx")?, num("ry")?);
            (rx > 0.0 && ry > 0.0).then(|| {
                let bounds = Rect::new(
                    Coord { x: cx - rx, y: cy - ry },
                    Coord { x: cx + rx, y: cy + ry },
                );
                (Outline::Ellipse { cx, cy, rx, ry }, bounds)
            })
        }
        _ => None,
    }
}

fn points_bounds(points: &[Coord<f64>]) -> Option<Rect<f64>> {
    if points.is_empty() {
        return None;
    }
    let mut min = Coord { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    for p in points {
        if !p.x.is_finite() || !p.y.is_finite() {
            continue;
        }
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min.x <= max.x && min.y <= max.y).then(|| Rect::new(min, max))
}

/// Parse `x,y x,y ...` pairs from a polygon `points` attribute.
fn number_pairs(text: &str) -> Vec<Coord<f64>> {
    let nums = lex_numbers(text);
    nums.chunks_exact(2).map(|c| Coord { x: c[0], y: c[1] }).collect()
}

/// Walk a path `d` attribute and collect the points it visits.
///
/// Supports the full command set; curve control points are included, so the
/// resulting bounding box is conservative. Arc segments contribute only
/// their endpoints.
fn path_points(d: &str) -> Vec<Coord<f64>> {
    let token_re = Regex::new(r"[a-zA-Z]|-?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("static regex");

    let mut points = Vec::new();
    let mut cur = Coord { x: 0.0, y: 0.0 };
    let mut subpath_start = cur;
    let mut cmd = 'M';

    let mut nums: Vec<f64> = Vec::new();
    let flush = |cmd: char, nums: &mut Vec<f64>, cur: &mut Coord<f64>,
                 subpath_start: &mut Coord<f64>, points: &mut Vec<Coord<f64>>| {
        let rel = cmd.is_ascii_lowercase();
        let upper = cmd.to_ascii_uppercase();
        match upper {
            'M' | 'L' | 'T' => {
                for (i, pair) in nums.chunks_exact(2).enumerate() {
                    let p = if rel {
                        Coord { x: cur.x + pair[0], y: cur.y + pair[1] }
                    } else {
                        Coord { x: pair[0], y: pair[1] }
                    };
                    *cur = p;
                    points.push(p);
                    if upper == 'M' && i == 0 {
                        *subpath_start = p;
                    }
                }
            }
            'H' => {
                for &x in nums.iter() {
                    cur.x = if rel { cur.x + x } else { x };
                    points.push(*cur);
                }
            }
            'V' => {
                for &y in nums.iter() {
                    cur.y = if rel { cur.y + y } else { y };
                    points.push(*cur);
                }
            }
            'C' | 'S' | 'Q' => {
                // Consume control points for the bounding box; the last pair
                // of each segment is the new current point.
                let seg = if upper == 'C' { 6 } else { 4 };
                for segment in nums.chunks_exact(seg) {
                    for pair in segment.chunks_exact(2) {
                        let p = if rel {
                            Coord { x: cur.x + pair[0], y: cur.y + pair[1] }
                        } else {
                            Coord { x: pair[0], y: pair[1] }
                        };
                        points.push(p);
                    }
                    let last = &segment[seg - 2..];
                    *cur = if rel {
                        Coord { x: cur.x + last[0], y: cur.y + last[1] }
                    } else {
                        Coord { x: last[0], y: last[1] }
                    };
                }
            }
            'A' => {
                for segment in nums.chunks_exact(7) {
                    let p = if rel {
                        Coord { x: cur.x + segment[5], y: cur.y + segment[6] }
                    } else {
                        Coord { x: segment[5], y: segment[6] }
                    };
                    *cur = p;
                    points.push(p);
                }
            }
            'Z' => *cur = *subpath_start,
            _ => {}
        }
        nums.clear();
    };

    for token in token_re.find_iter(d) {
        let token = token.as_str();
        if let Ok(n) = token.parse::<f64>() {
            nums.push(n);
        } else {
            let ch = token.chars().next().unwrap_or('Z');
            flush(cmd, &mut nums, &mut cur, &mut subpath_start, &mut points);
            cmd = ch;
            if ch.eq_ignore_ascii_case(&'z') {
                flush(cmd, &mut nums, &mut cur, &mut subpath_start, &mut points);
            }
        }
    }
    flush(cmd, &mut nums, &mut cur, &mut subpath_start, &mut points);

    points
}

fn parse_view_box(svg: &str) -> Option<Rect<f64>> {
    let svg_re = Regex::new(r"(?is)<svg\b[^>]*?\bviewBox\s*=\s*\x22([^\x22]*)\x22")
        .expect("static regex");
    let caps = svg_re.captures(svg)?;
    let nums = lex_numbers(&caps[1]);
    if nums.len() != 4 || nums[2] <= 0.0 || nums[3] <= 0.0 {
        return None;
    }
    Some(Rect::new(
        Coord { x: nums[0], y: nums[1] },
        Coord { x: nums[0] + nums[2], y: nums[1] + nums[3] },
    ))
}

fn lex_numbers(text: &str) -> Vec<f64> {
    let num_re = Regex::new(r"-?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("static regex");
    num_re
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINI: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 120">
  <path id="PEAAA" d="M10,10 L30,10 L30,30 L10,30 Z"/>
  <path id="PEBBB" d="m40,10 l20,0 l0,20 l-20,0 z"/>
  <circle id="PECCC" cx="20" cy="80" r="10"/>
  <rect id="PEDDD" x="50" y="70" width="30" height="20"/>
  <path d="M0,0 L1,1"/>
  <path id="PEEEE" d=""/>
</svg>"##;

    #[test]
    fn parses_addressable_shapes_only() {
        let asset = MapAsset::from_svg_str(MINI).unwrap();
        assert_eq!(asset.shapes().len(), 4);
        assert!(asset.contains(&ShapeId::new("PEAAA")));
        assert!(asset.contains(&ShapeId::new("PEDDD")));
        // No id, or no usable geometry: not addressable.
        assert!(!asset.contains(&ShapeId::new("PEEEE")));
        assert_eq!(asset.skipped(), &["PEEEE".to_string()]);
    }

    #[test]
    fn view_box_is_read_from_document() {
        let asset = MapAsset::from_svg_str(MINI).unwrap();
        let vb = asset.view_box();
        assert_eq!((vb.min().x, vb.min().y), (0.0, 0.0));
        assert_eq!((vb.width(), vb.height()), (100.0, 120.0));
    }

    #[test]
    fn absolute_and_relative_paths_measure_the_same() {
        let asset = MapAsset::from_svg_str(MINI).unwrap();
        let abs = asset.get(&ShapeId::new("PEAAA")).unwrap();
        let rel = asset.get(&ShapeId::new("PEBBB")).unwrap();
        assert_eq!((abs.bounds.width(), abs.bounds.height()), (20.0, 20.0));
        assert_eq!((rel.bounds.width(), rel.bounds.height()), (20.0, 20.0));
        assert_eq!(abs.centroid(), Coord { x: 20.0, y: 20.0 });
        assert_eq!(rel.centroid(), Coord { x: 50.0, y: 20.0 });
    }

    #[test]
    fn circle_and_rect_bounds() {
        let asset = MapAsset::from_svg_str(MINI).unwrap();
        let circle = asset.get(&ShapeId::new("PECCC")).unwrap();
        assert_eq!(circle.centroid(), Coord { x: 20.0, y: 80.0 });
        assert_eq!(circle.bounds.width(), 20.0);
        let rect = asset.get(&ShapeId::new("PEDDD")).unwrap();
        assert_eq!(rect.centroid(), Coord { x: 65.0, y: 80.0 });
    }

    #[test]
    fn hit_test_prefers_smallest_enclosing_shape() {
        let svg = r##"<svg viewBox="0 0 100 100">
            <rect id="PEBIG" x="0" y="0" width="100" height="100"/>
            <rect id="PESMALL" x="40" y="40" width="20" height="20"/>
        </svg>"##;
        let asset = MapAsset::from_svg_str(svg).unwrap();
        let hit = asset.shape_at(Coord { x: 50.0, y: 50.0 }).unwrap();
        assert_eq!(hit.id.as_str(), "PESMALL");
        let hit = asset.shape_at(Coord { x: 5.0, y: 5.0 }).unwrap();
        assert_eq!(hit.id.as_str(), "PEBIG");
        assert!(asset.shape_at(Coord { x: 500.0, y: 500.0 }).is_none());
    }

    #[test]
    fn no_shapes_is_an_error() {
        assert!(MapAsset::from_svg_str("<svg></svg>").is_err());
    }

    #[test]
    fn curve_and_arc_commands_are_measured() {
        let svg = r##"<svg viewBox="0 0 10 10">
            <path id="PECUR" d="M0,0 C1,2 3,2 4,0 S6,-2 8,0 A1,1 0 0 1 9,1 Z"/>
        </svg>"##;
        let asset = MapAsset::from_svg_str(svg).unwrap();
        let shape = asset.get(&ShapeId::new("PECUR")).unwrap();
        assert!(shape.bounds.width() >= 9.0);
    }
}
