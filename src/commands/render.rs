use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::{Cli, RenderArgs};
use crate::render::{MapAsset, MapRenderer};
use crate::resolve::{RegionTable, Resolver, CAPITAL_SHAPE_ID};
use crate::scale::intensity_map;
use crate::select::{ScreenTransform, SelectionCoordinator};
use crate::types::ShapeId;

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let output: PathBuf = args
        .output
        .clone()
        .unwrap_or_else(|| Path::new("choropleth.svg").to_path_buf());

    let samples = super::fetch_samples(args.endpoint.as_deref(), args.offline, cli.verbose)?;

    let resolution = Resolver::new(RegionTable::get()).resolve_all(samples);
    if cli.verbose > 0 {
        eprintln!(
            "[resolve] {} resolved, {} unresolved",
            resolution.resolved.len(),
            resolution.unresolved.len()
        );
        for sample in &resolution.unresolved {
            eprintln!("[resolve] unmatched region: {:?}", sample.name);
        }
    }

    let mut excluded = HashSet::new();
    if !args.include_capital {
        excluded.insert(ShapeId::new(CAPITAL_SHAPE_ID));
    }
    let intensities = intensity_map(&resolution.resolved, &excluded);

    let asset = MapAsset::from_svg_file(&args.map)?;
    if cli.verbose > 0 {
        eprintln!("[asset] {} shapes", asset.shapes().len());
        for id in asset.skipped() {
            eprintln!("[asset] unmeasurable shape: {id:?}");
        }
    }

    let mut renderer = MapRenderer::new(asset);
    renderer.bind(&intensities);

    if let Some(name) = &args.highlight {
        let height = args.width * renderer.asset().view_box().height()
            / renderer.asset().view_box().width();
        let mut coordinator = SelectionCoordinator::new(&resolution.resolved);
        coordinator.mount(
            ScreenTransform::fit(renderer.asset().view_box(), args.width, height),
            args.width,
        );
        coordinator.select_by_region_name(&mut renderer, name);
        match coordinator.selection() {
            Some(sel) if cli.verbose > 0 => {
                eprintln!(
                    "[render] highlight {} at ({:.1}, {:.1})",
                    sel.shape_id, sel.screen_x, sel.screen_y
                );
            }
            None => eprintln!("[render] no region matches {name:?}, highlight skipped"),
            _ => {}
        }
    }

    renderer.write_svg(&output, args.width)?;
    println!("Wrote map -> {}", output.display());
    Ok(())
}
