use std::path::PathBuf;

/// Presence map CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "presencia", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the sales choropleth to an SVG file
    Render(RenderArgs),

    /// Print resolution and scaling diagnostics for the current dataset
    Regions(RegionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Vector map asset (SVG whose shapes carry region ids)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub map: PathBuf,

    /// Output file, defaults to "./choropleth.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Sales-by-region endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Skip the endpoint and render from the bundled dataset
    #[arg(long)]
    pub offline: bool,

    /// Keep the capital's total in the scale maximum
    #[arg(long)]
    pub include_capital: bool,

    /// Output width in pixels
    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,

    /// Region name to render highlighted
    #[arg(long)]
    pub highlight: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RegionsArgs {
    /// Sales-by-region endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Skip the endpoint and use the bundled dataset
    #[arg(long)]
    pub offline: bool,

    /// Keep the capital's total in the scale maximum
    #[arg(long)]
    pub include_capital: bool,

    /// Emit the ranked list as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
