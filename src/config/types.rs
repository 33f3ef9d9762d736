use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Depth used when `settings.crawler.maxDepth` is absent (seed page only)
pub const DEFAULT_MAX_DEPTH: u32 = 1;

/// Audit concurrency used when `settings.crawler.maxChromeInstances` is absent
pub const DEFAULT_MAX_CHROME_INSTANCES: usize = 1;

/// Top-level configuration file
///
/// Only `settings.crawler` is interpreted here. Everything else belongs to
/// the audit tool and is kept in `extra` so nothing is lost.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `settings` block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed URL (the seed is depth 1)
    ///
    /// `0` is read as the default, so it still audits the seed page only.
    #[serde(
        rename = "maxDepth",
        default = "default_max_depth",
        deserialize_with = "deserialize_max_depth"
    )]
    pub max_depth: u32,

    /// Maximum number of audit-tool instances running at once
    #[serde(
        rename = "maxChromeInstances",
        default = "default_max_chrome_instances"
    )]
    pub max_chrome_instances: usize,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_chrome_instances: DEFAULT_MAX_CHROME_INSTANCES,
            extra: Map::new(),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_max_chrome_instances() -> usize {
    DEFAULT_MAX_CHROME_INSTANCES
}

fn deserialize_max_depth<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match u32::deserialize(deserializer)? {
        0 => Ok(DEFAULT_MAX_DEPTH),
        depth => Ok(depth),
    }
}
