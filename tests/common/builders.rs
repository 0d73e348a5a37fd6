//! Test data builders for creating test objects

use live_scope::{AppConfig, Session};

/// Builder for session configurations
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.display.default_capacity = capacity;
        self
    }

    pub fn autoscale(mut self, enabled: bool) -> Self {
        self.config.display.autoscale = enabled;
        self
    }

    pub fn page_url(mut self, url: &str) -> Self {
        self.config.server.page_url = url.to_string();
        self
    }

    pub fn max_diagnostics(mut self, max: usize) -> Self {
        self.config.display.max_diagnostics = max;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }

    pub fn session(self) -> Session {
        Session::new(&self.config).expect("test configuration should be valid")
    }
}

/// JSON text for a sample message
pub fn sample_json(value: f64) -> String {
    format!(r#"{{"value": {}}}"#, value)
}

/// JSON text for a server-reported error
pub fn error_json(message: &str) -> String {
    format!(r#"{{"error": "{}"}}"#, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .capacity(8)
            .autoscale(true)
            .page_url("https://example.com")
            .build();

        assert_eq!(config.display.default_capacity, 8);
        assert!(config.display.autoscale);
        assert_eq!(config.server.page_url, "https://example.com");
    }
}
