pub mod regions;
pub mod render;

use crate::source::{load_samples, CancelToken, HttpSampleSource, StaticSampleSource, DEFAULT_ENDPOINT};
use crate::types::RegionSample;
use anyhow::Result;

/// Fetch samples for a command: the endpoint (with fallback) unless
/// `offline` skips straight to the bundled dataset.
fn fetch_samples(endpoint: Option<&str>, offline: bool, verbose: u8) -> Result<Vec<RegionSample>> {
    if offline {
        if verbose > 0 {
            eprintln!("[fetch] offline, using bundled dataset");
        }
        return Ok(StaticSampleSource::samples());
    }

    let url = endpoint.unwrap_or(DEFAULT_ENDPOINT);
    if verbose > 0 {
        eprintln!("[fetch] GET {url}");
    }

    let source = HttpSampleSource::new(url)?;
    let samples = load_samples(&source, &CancelToken::new())
        .expect("token is never cancelled here");

    if verbose > 0 {
        eprintln!("[fetch] {} samples", samples.len());
    }
    Ok(samples)
}
