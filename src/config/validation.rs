use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;

/// Upper bound on concurrent audit-tool instances
const MAX_CHROME_INSTANCES_LIMIT: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.settings.crawler)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth is never 0 here; deserialization maps it to the default

    if config.max_chrome_instances < 1 || config.max_chrome_instances > MAX_CHROME_INSTANCES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "maxChromeInstances must be between 1 and {}, got {}",
            MAX_CHROME_INSTANCES_LIMIT, config.max_chrome_instances
        )));
    }

    Ok(())
}
