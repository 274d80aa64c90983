use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let geocoder_rest_key = require("AGRIMAP_GEOCODER_REST_KEY")?;

    let portal_base_url = or_default("AGRIMAP_PORTAL_BASE_URL", "http://localhost:8000");
    let geocoder_base_url = or_default("AGRIMAP_GEOCODER_BASE_URL", "https://dapi.kakao.com");
    let auth_token = lookup("AGRIMAP_AUTH_TOKEN").ok();
    let log_level = or_default("AGRIMAP_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("AGRIMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("AGRIMAP_USER_AGENT", "agrimap/0.1 (rental-map)");

    let geocode_batch_size = parse_usize("AGRIMAP_GEOCODE_BATCH_SIZE", "5")?;
    if geocode_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AGRIMAP_GEOCODE_BATCH_SIZE".to_string(),
            reason: "batch size must be at least 1".to_string(),
        });
    }
    let geocode_inter_batch_delay_ms = parse_u64("AGRIMAP_GEOCODE_INTER_BATCH_DELAY_MS", "200")?;
    let geocode_max_retries = parse_u32("AGRIMAP_GEOCODE_MAX_RETRIES", "2")?;
    let geocode_retry_delay_ms = parse_u64("AGRIMAP_GEOCODE_RETRY_DELAY_MS", "100")?;

    let session_idle_timeout_secs = parse_u64("AGRIMAP_SESSION_IDLE_TIMEOUT_SECS", "1800")?;

    Ok(AppConfig {
        portal_base_url,
        geocoder_base_url,
        geocoder_rest_key,
        auth_token,
        log_level,
        request_timeout_secs,
        user_agent,
        geocode_batch_size,
        geocode_inter_batch_delay_ms,
        geocode_max_retries,
        geocode_retry_delay_ms,
        session_idle_timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("AGRIMAP_GEOCODER_REST_KEY", "test-rest-key");
        m
    }

    #[test]
    fn build_app_config_fails_without_geocoder_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "AGRIMAP_GEOCODER_REST_KEY"),
            "expected MissingEnvVar(AGRIMAP_GEOCODER_REST_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.portal_base_url, "http://localhost:8000");
        assert_eq!(cfg.geocoder_base_url, "https://dapi.kakao.com");
        assert!(cfg.auth_token.is_none());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "agrimap/0.1 (rental-map)");
        assert_eq!(cfg.geocode_batch_size, 5);
        assert_eq!(cfg.geocode_inter_batch_delay_ms, 200);
        assert_eq!(cfg.geocode_max_retries, 2);
        assert_eq!(cfg.geocode_retry_delay_ms, 100);
        assert_eq!(cfg.session_idle_timeout_secs, 1800);
    }

    #[test]
    fn build_app_config_reads_auth_token() {
        let mut map = full_env();
        map.insert("AGRIMAP_AUTH_TOKEN", "bearer-token-value");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.auth_token.as_deref(), Some("bearer-token-value"));
    }

    #[test]
    fn build_app_config_overrides_batch_tunables() {
        let mut map = full_env();
        map.insert("AGRIMAP_GEOCODE_BATCH_SIZE", "10");
        map.insert("AGRIMAP_GEOCODE_INTER_BATCH_DELAY_MS", "50");
        map.insert("AGRIMAP_GEOCODE_MAX_RETRIES", "4");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geocode_batch_size, 10);
        assert_eq!(cfg.geocode_inter_batch_delay_ms, 50);
        assert_eq!(cfg.geocode_max_retries, 4);
    }

    #[test]
    fn build_app_config_rejects_zero_batch_size() {
        let mut map = full_env();
        map.insert("AGRIMAP_GEOCODE_BATCH_SIZE", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AGRIMAP_GEOCODE_BATCH_SIZE"),
            "expected InvalidEnvVar(AGRIMAP_GEOCODE_BATCH_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_numeric_delay() {
        let mut map = full_env();
        map.insert("AGRIMAP_GEOCODE_INTER_BATCH_DELAY_MS", "fast");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AGRIMAP_GEOCODE_INTER_BATCH_DELAY_MS"),
            "expected InvalidEnvVar(AGRIMAP_GEOCODE_INTER_BATCH_DELAY_MS), got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut map = full_env();
        map.insert("AGRIMAP_AUTH_TOKEN", "super-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("test-rest-key"));
    }
}
