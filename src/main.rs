use anyhow::Result;
use clap::Parser;

use presencia::cli::{Cli, Commands};
use presencia::commands::{regions, render};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
        Commands::Regions(args) => regions::run(&cli, args),
    }
}
