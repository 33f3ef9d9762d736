use url::Url;

/// The part of the web a crawl is allowed to visit
///
/// Discovery stays on the seed's host and (effective) port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    host: String,
    port: Option<u16>,
}

impl SiteScope {
    /// Builds the scope of a seed URL, or `None` if it has no host
    pub fn from_seed(seed: &Url) -> Option<Self> {
        let host = seed.host_str()?.to_lowercase();
        Some(Self {
            host,
            port: seed.port_or_known_default(),
        })
    }

    /// The host this scope is restricted to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL lives on the same site as the seed
    pub fn contains(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                host.eq_ignore_ascii_case(&self.host) && url.port_or_known_default() == self.port
            }
            None => false,
        }
    }
}
