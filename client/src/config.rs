//! Client configuration

use std::env;

/// API client configuration struct
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend API, including the `/api` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SHORTVID_API_BASE_URL`: backend base URL (default: "http://localhost:8000/api")
    /// - `SHORTVID_HTTP_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let base_url = env::var("SHORTVID_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".to_string());

        let timeout_secs = env::var("SHORTVID_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        ApiConfig {
            base_url: normalize_base_url(base_url),
            timeout_secs,
        }
    }

    /// Build a config for an explicit base URL, keeping the default timeout
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: normalize_base_url(base_url.into()),
            timeout_secs: 30,
        }
    }
}

/// Strip trailing slashes so endpoint paths can always start with one
fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_api_config_from_env_defaults() {
        unsafe {
            std::env::remove_var("SHORTVID_API_BASE_URL");
            std::env::remove_var("SHORTVID_HTTP_TIMEOUT_SECS");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_api_config_from_env_overrides() {
        unsafe {
            std::env::set_var("SHORTVID_API_BASE_URL", "http://10.0.0.5:8000/api/");
            std::env::set_var("SHORTVID_HTTP_TIMEOUT_SECS", "5");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, "http://10.0.0.5:8000/api");
        assert_eq!(config.timeout_secs, 5);

        unsafe {
            std::env::remove_var("SHORTVID_API_BASE_URL");
            std::env::remove_var("SHORTVID_HTTP_TIMEOUT_SECS");
        }
    }
}
