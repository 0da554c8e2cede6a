//! Sales-by-region sample ingestion: the remote endpoint, the bundled
//! fallback dataset, and the shared fetch entry point every consumer uses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::types::RegionSample;

/// Production sales-by-region endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://crudventas-2946605267.us-central1.run.app?area=VENTAS_REGIONES";

/// Bundled dataset served when the endpoint is unreachable. Same shape as a
/// successful response; downstream components cannot tell the difference.
const FALLBACK: &[(&str, f64)] = &[
    ("LIMA", 4_778_414.63),
    ("ICA", 41_675.0),
    ("AREQUIPA", 280_000.0),
    ("CUSCO", 190_000.0),
    ("PIURA", 230_000.0),
    ("LA LIBERTAD", 310_000.0),
    ("ANCASH", 180_000.0),
    ("CAJAMARCA", 150_000.0),
    ("LAMBAYEQUE", 120_000.0),
    ("JUNIN", 140_000.0),
    ("AYACUCHO", 95_000.0),
    ("APURIMAC", 85_000.0),
    ("HUANCAVELICA", 75_000.0),
    ("PASCO", 65_000.0),
    ("HUANUCO", 55_000.0),
    ("SAN MARTIN", 45_000.0),
    ("MOQUEGUA", 35_000.0),
    ("TACNA", 25_000.0),
    ("PUNO", 30_000.0),
];

/// A provider of raw region samples.
pub trait SampleSource {
    fn fetch(&self) -> Result<Vec<RegionSample>>;
}

/// Fetches samples from the sales endpoint.
pub struct HttpSampleSource {
    url: String,
    client: Client,
}

impl HttpSampleSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("presencia/0.1")
            .timeout(Duration::from_secs(10))
            .build()
            .context("[source] failed to build HTTP client")?;
        Ok(Self { url: url.into(), client })
    }
}

impl SampleSource for HttpSampleSource {
    fn fetch(&self) -> Result<Vec<RegionSample>> {
        let text = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("GET {} returned error status", self.url))?
            .text()
            .with_context(|| format!("GET {} body could not be read", self.url))?;

        let body: Value = serde_json::from_str(&text)
            .with_context(|| format!("GET {} returned unparseable body", self.url))?;

        parse_samples(&body)
    }
}

/// Serves the bundled dataset.
pub struct StaticSampleSource;

impl StaticSampleSource {
    pub fn samples() -> Vec<RegionSample> {
        FALLBACK
            .iter()
            .map(|&(name, total)| RegionSample::new(name, total))
            .collect()
    }
}

impl SampleSource for StaticSampleSource {
    fn fetch(&self) -> Result<Vec<RegionSample>> {
        Ok(Self::samples())
    }
}

/// Cancellation flag captured at invocation time. A fetch that completes
/// after cancellation is discarded; a late response can never mutate state
/// after teardown.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fetch samples with fallback. Any transport failure, malformed body, or
/// empty result substitutes the bundled dataset; this is recovery, not an
/// error state. Returns `None` only when the token was cancelled, in which
/// case the result (either way) is discarded.
pub fn load_samples(source: &dyn SampleSource, cancel: &CancelToken) -> Option<Vec<RegionSample>> {
    let samples = source.fetch().unwrap_or_else(|_| StaticSampleSource::samples());
    if cancel.is_cancelled() {
        return None;
    }
    Some(samples)
}

/// Decode the endpoint body: a JSON array of objects with a `REGION` name
/// and a numeric-or-numeric-string `TOTAL`. Malformed entries (empty name,
/// unparseable or negative total) are filtered out silently; an empty or
/// non-array body is a transport-level failure that triggers the fallback.
fn parse_samples(body: &Value) -> Result<Vec<RegionSample>> {
    let Some(items) = body.as_array() else {
        bail!("[source] endpoint body is not an array");
    };

    let samples: Vec<RegionSample> = items.iter().filter_map(sample_from_item).collect();

    if samples.is_empty() {
        bail!("[source] endpoint returned no usable samples");
    }
    Ok(samples)
}

fn sample_from_item(item: &Value) -> Option<RegionSample> {
    let name = item.get("REGION")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let total = match item.get("TOTAL")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !total.is_finite() || total < 0.0 {
        return None;
    }

    Some(RegionSample::new(name, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSource;
    impl SampleSource for FailingSource {
        fn fetch(&self) -> Result<Vec<RegionSample>> {
            bail!("connection refused")
        }
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        let body = json!([
            { "REGION": "LIMA", "TOTAL": 4778414.63 },
            { "REGION": "CUSCO", "TOTAL": "190000" },
        ]);
        let samples = parse_samples(&body).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], RegionSample::new("LIMA", 4_778_414.63));
        assert_eq!(samples[1], RegionSample::new("CUSCO", 190_000.0));
    }

    #[test]
    fn filters_malformed_entries_silently() {
        let body = json!([
            { "REGION": "LIMA", "TOTAL": 100.0 },
            { "REGION": "", "TOTAL": 50.0 },
            { "REGION": "   ", "TOTAL": 50.0 },
            { "REGION": "CUSCO" },
            { "REGION": "PIURA", "TOTAL": "not a number" },
            { "REGION": "TACNA", "TOTAL": -5.0 },
            { "REGION": "ICA", "TOTAL": null },
            { "TOTAL": 10.0 },
            42,
        ]);
        let samples = parse_samples(&body).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "LIMA");
    }

    #[test]
    fn names_are_trimmed() {
        let body = json!([{ "REGION": "  AREQUIPA  ", "TOTAL": 1.0 }]);
        let samples = parse_samples(&body).unwrap();
        assert_eq!(samples[0].name, "AREQUIPA");
    }

    #[test]
    fn empty_or_non_array_bodies_are_errors() {
        assert!(parse_samples(&json!([])).is_err());
        assert!(parse_samples(&json!({ "REGION": "LIMA" })).is_err());
        assert!(parse_samples(&json!([{ "REGION": "", "TOTAL": 1.0 }])).is_err());
    }

    #[test]
    fn fallback_on_failure_is_indistinguishable() {
        let samples = load_samples(&FailingSource, &CancelToken::new()).unwrap();
        assert_eq!(samples.len(), FALLBACK.len());
        assert_eq!(samples[0], RegionSample::new("LIMA", 4_778_414.63));
    }

    #[test]
    fn cancelled_fetch_is_discarded() {
        let token = CancelToken::new();
        token.cancel();
        assert!(load_samples(&StaticSampleSource, &token).is_none());
        assert!(load_samples(&FailingSource, &token).is_none());
    }

    #[test]
    fn static_source_matches_fallback() {
        let samples = StaticSampleSource.fetch().unwrap();
        assert_eq!(samples.len(), 19);
        assert!(samples.iter().all(|s| s.total >= 0.0));
    }
}
