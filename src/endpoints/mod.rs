// src/endpoints/mod.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// A named URL to be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One entry of an endpoint list file.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionedUrl {
    pub url: String,
    pub caption: String,
}

/// Accepted shapes of an endpoint file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EndpointFile {
    List(Vec<CaptionedUrl>),
    Map(BTreeMap<String, String>),
}

impl EndpointFile {
    fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            EndpointFile::List(items) => items.into_iter().map(|i| (i.caption, i.url)).collect(),
            EndpointFile::Map(map) => map.into_iter().collect(),
        }
    }
}

/// Collapse `(name, url)` pairs into endpoints with unique names.
/// A repeated name keeps the URL seen last.
pub fn from_pairs<I>(pairs: I) -> Vec<Endpoint>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut by_name: BTreeMap<String, String> = BTreeMap::new();
    for (name, url) in pairs {
        if let Some(previous) = by_name.insert(name.clone(), url) {
            warn!("Duplicate endpoint name '{}', replacing {}", name, previous);
        }
    }

    by_name
        .into_iter()
        .map(|(name, url)| Endpoint { name, url })
        .collect()
}

/// Load endpoints from a file (JSON or YAML)
pub async fn load_endpoints<P: AsRef<Path>>(path: P) -> Result<Vec<Endpoint>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("File '{}' not found or unreadable", path.display()))?;

    let ext = path.extension().and_then(|s| s.to_str());
    let file: EndpointFile = if ext == Some("yaml") || ext == Some("yml") {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML in file '{}'", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in file '{}'", path.display()))?
    };

    let endpoints = from_pairs(file.into_pairs());
    debug!("Loaded {} endpoints from {}", endpoints.len(), path.display());
    Ok(endpoints)
}

/// Endpoints checked when no input file is given.
pub fn sample_endpoints() -> Vec<Endpoint> {
    from_pairs(
        [
            ("Google", "https://www.google.com"),
            ("Amazon", "https://www.amazon.com"),
            ("Github", "https://www.github.com"),
        ]
        .into_iter()
        .map(|(name, url)| (name.to_string(), url.to_string())),
    )
}
