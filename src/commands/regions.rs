use std::collections::HashSet;

use anyhow::Result;

use crate::cli::{Cli, RegionsArgs};
use crate::common::format_total;
use crate::list::ranked_list;
use crate::resolve::{RegionTable, Resolver, CAPITAL_SHAPE_ID};
use crate::scale::intensity_map;
use crate::types::ShapeId;

pub fn run(cli: &Cli, args: &RegionsArgs) -> Result<()> {
    let samples = super::fetch_samples(args.endpoint.as_deref(), args.offline, cli.verbose)?;

    let resolution = Resolver::new(RegionTable::get()).resolve_all(samples);

    let mut excluded = HashSet::new();
    if !args.include_capital {
        excluded.insert(ShapeId::new(CAPITAL_SHAPE_ID));
    }
    let intensities = intensity_map(&resolution.resolved, &excluded);
    let list = ranked_list(&resolution.resolved, &intensities);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for entry in list {
        println!(
            "{:>3}. {:<28} {}  {:>14}  {:.3}",
            entry.rank,
            entry.name,
            entry.shape_id,
            format_total(entry.total),
            entry.intensity,
        );
    }

    if !resolution.unresolved.is_empty() {
        println!();
        println!("Unresolved ({}):", resolution.unresolved.len());
        for sample in &resolution.unresolved {
            println!("  {:?} ({})", sample.name, format_total(sample.total));
        }
    }

    Ok(())
}
