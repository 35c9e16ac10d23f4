//! Loading the CPU catalog.
//!
//! The catalog has been stored in three layouts over time:
//!
//! * the original one, with an `id` and a single `benchmarks` block
//!   (`singleCore`/`multiCore`/`gaming`);
//! * a multi-source layout keyed by `id`, carrying `passmark`/`geekbench` blocks;
//! * the same multi-source layout as exported from the document store, keyed by
//!   `_id` (either a plain string or an `{"$oid": ...}` object).
//!
//! All of them are folded into [`Cpu`] here, and nowhere else.

use anyhow::{bail, Context};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, PickFirst};
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::PathBuf,
};
use tracing::{info, warn};

use crate::{
    common::{parse_amount, Amount, Client, IgnoreComma},
    schemas::computing::{BenchmarkBlock, Brand, Cache, Cpu},
};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// The whole collection, already adapted. Individual records that can't be
    /// adapted are dropped, not reported as errors.
    async fn load(&self) -> anyhow::Result<Vec<Cpu>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordShape {
    Legacy,
    MultiSource,
    DocumentStore,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
            Self::ObjectId { oid } => oid,
        }
    }
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCpu {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(rename = "_id", default)]
    document_id: Option<RawId>,
    name: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    series: Option<String>,
    #[serde(default)]
    socket: String,
    #[serde(default)]
    architecture: String,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, IgnoreComma<u32>)>>")]
    cores: u32,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, IgnoreComma<u32>)>>")]
    threads: u32,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, IgnoreComma<f64>)>>")]
    base_clock: f64,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, IgnoreComma<f64>)>>")]
    boost_clock: f64,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, IgnoreComma<f64>)>>")]
    tdp: f64,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, Amount)>>")]
    price: f64,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    features: BTreeSet<String>,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError")]
    cache: Option<Cache>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    asins: Vec<String>,
    /// Whatever is left: benchmark blocks live here, under their source name.
    /// Anything that isn't one (e.g. the legacy `shop` prices) is ignored.
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

/// Numeric entries of a JSON object, or `None` if there aren't any.
fn benchmark_block(value: &Value) -> Option<BenchmarkBlock> {
    let block: BenchmarkBlock = value
        .as_object()?
        .iter()
        .filter_map(|(metric, score)| {
            let score = score
                .as_f64()
                .or_else(|| score.as_str().and_then(parse_amount))?;
            Some((metric.clone(), score))
        })
        .collect();
    (!block.is_empty()).then(|| block)
}

fn parse_release_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
        .ok()
}

impl RawCpu {
    fn shape(&self) -> RecordShape {
        if self.document_id.is_some() {
            RecordShape::DocumentStore
        } else if self.rest.contains_key("benchmarks")
            && self
                .rest
                .iter()
                .all(|(key, value)| key == "benchmarks" || benchmark_block(value).is_none())
        {
            RecordShape::Legacy
        } else {
            RecordShape::MultiSource
        }
    }

    fn adapt(self) -> anyhow::Result<(Cpu, RecordShape)> {
        let shape = self.shape();
        let id = self
            .id
            .or(self.document_id)
            .map(RawId::into_string)
            .filter(|id| !id.is_empty())
            .context("record has neither `id` nor `_id`")?;

        let benchmarks: BTreeMap<String, BenchmarkBlock> = self
            .rest
            .iter()
            .filter_map(|(source, value)| Some((source.clone(), benchmark_block(value)?)))
            .collect();

        let brand = self
            .brand
            .as_deref()
            .and_then(|b| b.parse::<Brand>().ok())
            .unwrap_or(Brand::Other);

        let cpu = Cpu {
            id,
            name: self.name,
            brand,
            series: self.series,
            socket: self.socket,
            architecture: self.architecture,
            cores: self.cores,
            threads: self.threads,
            base_clock: self.base_clock,
            boost_clock: self.boost_clock,
            tdp: self.tdp.round() as u32,
            price: self.price,
            release_date: self.release_date.as_deref().and_then(parse_release_date),
            features: self.features,
            cache: self.cache,
            image_url: self.image_url,
            asins: self.asins,
            benchmarks,
        };
        Ok((cpu, shape))
    }
}

/// Fold raw catalog records into [`Cpu`]s, keeping the first record of any repeated identity.
pub fn adapt_records(records: Vec<Value>) -> Vec<Cpu> {
    let total = records.len();
    let mut seen = HashSet::new();
    let mut shapes: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut cpus = Vec::with_capacity(total);

    for (index, record) in records.into_iter().enumerate() {
        let adapted = serde_json::from_value::<RawCpu>(record)
            .map_err(anyhow::Error::from)
            .and_then(RawCpu::adapt);
        match adapted {
            Ok((cpu, shape)) => {
                if !seen.insert(cpu.id.clone()) {
                    warn!(index, id = %cpu.id, "dropping catalog record with duplicate id");
                    continue;
                }
                *shapes
                    .entry(match shape {
                        RecordShape::Legacy => "legacy",
                        RecordShape::MultiSource => "multi_source",
                        RecordShape::DocumentStore => "document_store",
                    })
                    .or_default() += 1;
                cpus.push(cpu);
            }
            Err(err) => warn!(index, error = %err, "dropping catalog record"),
        }
    }

    info!(total, kept = cpus.len(), ?shapes, "adapted catalog");
    cpus
}

/// The catalog endpoint: a document-store `find` over one collection.
pub struct EndpointCatalog {
    client: Client,
    url: String,
    database_name: String,
    collection_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    database_name: &'a str,
    collection_name: &'a str,
}

impl EndpointCatalog {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        database_name: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            database_name: database_name.into(),
            collection_name: collection_name.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for EndpointCatalog {
    async fn load(&self) -> anyhow::Result<Vec<Cpu>> {
        let res = self
            .client
            .0
            .post(&self.url)
            .json(&FindRequest {
                database_name: &self.database_name,
                collection_name: &self.collection_name,
            })
            .send()
            .await
            .with_context(|| format!("requesting catalog from {}", self.url))?;
        if !res.status().is_success() {
            bail!("catalog endpoint {} returned {}", self.url, res.status());
        }
        let records: Option<Vec<Value>> = res.json().await.context("parsing catalog response")?;
        Ok(adapt_records(records.unwrap_or_default()))
    }
}

/// A catalog dump on disk: one JSON array of records, in any of the known layouts.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load(&self) -> anyhow::Result<Vec<Cpu>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading catalog {}", self.path.display()))?;
        let records: Vec<Value> = serde_json::from_str(&text)
            .with_context(|| format!("parsing catalog {}", self.path.display()))?;
        Ok(adapt_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::{adapt_records, CatalogSource, EndpointCatalog, FileCatalog, RawCpu, RecordShape};
    use crate::{
        common::{tests::serve_once, Client},
        schemas::computing::Brand,
    };
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::tempdir;

    fn endpoint(url: String) -> EndpointCatalog {
        EndpointCatalog::new(Client::default(), url, "codex", "cpus")
    }

    #[test]
    fn test_legacy_record() {
        let cpus = adapt_records(vec![json!({
            "id": "ryzen-5-5600x",
            "name": "Ryzen 5 5600X",
            "brand": "AMD",
            "series": "Ryzen 5",
            "cores": 6,
            "threads": 12,
            "baseClock": 3.7,
            "boostClock": 4.6,
            "tdp": 65,
            "socket": "AM4",
            "price": 199,
            "releaseDate": "2020-11-05",
            "architecture": "Zen 3",
            "cache": { "l1": "384KB", "l2": "3MB", "l3": "32MB" },
            "benchmarks": { "singleCore": 1600, "multiCore": 8200, "gaming": 92 },
            "shop": { "amazon": { "price": 189 }, "ebay": { "price": 170 } },
            "features": ["PCIe 4.0", "PCIe 4.0"],
            "imageUrl": "https://example.com/5600x.png"
        })]);

        assert_eq!(cpus.len(), 1);
        let cpu = &cpus[0];
        assert_eq!(cpu.id, "ryzen-5-5600x");
        assert_eq!(cpu.brand, Brand::AMD);
        assert_eq!(cpu.release_date, NaiveDate::from_ymd_opt(2020, 11, 5));
        assert_eq!(cpu.score("benchmarks", "multiCore"), Some(8200.0));
        assert_eq!(cpu.benchmarks.len(), 1, "shop and cache are not benchmark blocks");
        assert_eq!(cpu.features.len(), 1);
        assert_eq!(cpu.cache.as_ref().unwrap().l3.as_deref(), Some("32MB"));
    }

    #[test]
    fn test_multi_source_record_with_numeric_id() {
        let cpus = adapt_records(vec![json!({
            "id": 7950,
            "name": "Ryzen 9 7950X",
            "brand": "amd",
            "cores": "16",
            "price": "$549.00",
            "passmark": { "cpuScore": "62,910", "threadScore": 4280 },
            "geekbench": { "singleScore": 2900, "multiScore": 21000 }
        })]);

        let cpu = &cpus[0];
        assert_eq!(cpu.id, "7950");
        assert_eq!(cpu.cores, 16);
        assert_eq!(cpu.price, 549.0);
        assert_eq!(cpu.score("passmark", "cpuScore"), Some(62910.0));
        assert_eq!(cpu.score("geekbench", "multiScore"), Some(21000.0));
    }

    #[test]
    fn test_document_store_record() {
        let cpus = adapt_records(vec![
            json!({
                "_id": { "$oid": "65f1c0ffee" },
                "name": "Core i5-13600K",
                "brand": "Intel",
                "releaseDate": "2022-10",
                "asins": ["B0BCF57FL5", "B0BG6843GR"],
                "passmark": { "cpuScore": 38000 }
            }),
            json!({
                "_id": "plain-string-id",
                "name": "M2",
                "brand": "Apple",
                "cores": "lots",
                "geekbench": { "singleScore": 2600 }
            }),
        ]);

        assert_eq!(cpus.len(), 2);
        assert_eq!(cpus[0].id, "65f1c0ffee");
        assert_eq!(cpus[0].release_date, NaiveDate::from_ymd_opt(2022, 10, 1));
        assert_eq!(cpus[0].asins, vec!["B0BCF57FL5", "B0BG6843GR"]);
        assert_eq!(cpus[1].id, "plain-string-id");
        assert_eq!(cpus[1].cores, 0, "unparseable numbers fall back to zero");
    }

    #[test]
    fn test_bad_records_are_dropped() {
        let cpus = adapt_records(vec![
            json!({ "name": "no identity" }),
            json!({ "id": "no-name" }),
            json!("not even an object"),
            json!({ "id": "ok", "name": "Fine" }),
            json!({ "id": "ok", "name": "Duplicate" }),
        ]);

        assert_eq!(cpus.len(), 1);
        assert_eq!(cpus[0].name, "Fine");
        assert_eq!(cpus[0].brand, Brand::Other);
    }

    #[tokio::test]
    async fn test_file_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cpus.json");
        tokio::fs::write(
            &path,
            r#"[{ "id": "a", "name": "A", "passmark": { "cpuScore": 1 } }]"#,
        )
        .await
        .unwrap();

        let cpus = FileCatalog::new(&path).load().await.unwrap();
        assert_eq!(cpus.len(), 1);
        assert_eq!(cpus[0].score("passmark", "cpuScore"), Some(1.0));

        assert!(FileCatalog::new(dir.path().join("missing.json"))
            .load()
            .await
            .is_err());
    }

    #[test]
    fn test_record_shapes() {
        let shape = |value| serde_json::from_value::<RawCpu>(value).unwrap().shape();
        assert_eq!(
            shape(json!({ "id": "a", "name": "A", "benchmarks": { "gaming": 90 }, "shop": {} })),
            RecordShape::Legacy
        );
        assert_eq!(
            shape(json!({ "id": "a", "name": "A", "passmark": { "cpuScore": 1 } })),
            RecordShape::MultiSource
        );
        assert_eq!(
            shape(json!({ "_id": "a", "name": "A", "geekbench": { "multiScore": 1 } })),
            RecordShape::DocumentStore
        );
    }

    #[tokio::test]
    async fn test_endpoint_catalog() {
        let url = serve_once("200 OK", r#"[{ "_id": "x", "name": "X", "passmark": { "cpuScore": 5 } }]"#)
            .await;
        let cpus = endpoint(url).load().await.unwrap();
        assert_eq!(cpus.len(), 1);
        assert_eq!(cpus[0].id, "x");

        let url = serve_once("200 OK", "null").await;
        assert!(endpoint(url).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_error_status() {
        let url = serve_once("500 Internal Server Error", "").await;
        let err = endpoint(url).load().await.unwrap_err();
        assert!(err.to_string().contains("500"), "{}", err);
    }
}
