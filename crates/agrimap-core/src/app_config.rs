/// Runtime configuration for the rental-map client, loaded from environment
/// variables by [`crate::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    pub portal_base_url: String,
    pub geocoder_base_url: String,
    pub geocoder_rest_key: String,
    /// Ambient bearer token for the favorites API. Absent means the session
    /// is unauthenticated; favorite actions are then rejected client-side.
    pub auth_token: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub geocode_batch_size: usize,
    pub geocode_inter_batch_delay_ms: u64,
    pub geocode_max_retries: u32,
    pub geocode_retry_delay_ms: u64,
    pub session_idle_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("portal_base_url", &self.portal_base_url)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_rest_key", &"[redacted]")
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("geocode_batch_size", &self.geocode_batch_size)
            .field(
                "geocode_inter_batch_delay_ms",
                &self.geocode_inter_batch_delay_ms,
            )
            .field("geocode_max_retries", &self.geocode_max_retries)
            .field("geocode_retry_delay_ms", &self.geocode_retry_delay_ms)
            .field(
                "session_idle_timeout_secs",
                &self.session_idle_timeout_secs,
            )
            .finish()
    }
}
