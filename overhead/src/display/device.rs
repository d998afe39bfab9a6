//! Display device trait and AWTRIX 3 HTTP implementation.
//!
//! The [`DisplayDevice`] trait is the only way the rest of the crate talks
//! to the LED clock. [`AwtrixClient`] implements it over the AWTRIX 3 HTTP
//! API using a reusable `reqwest::Client`.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::payload::CustomPayload;

/// Default HTTP timeout for device requests.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Built-in apps toggled by [`DisplayDevice::set_native_apps`].
const NATIVE_APP_KEYS: [&str; 5] = ["TIM", "DAT", "HUM", "TEMP", "BAT"];

/// Errors talking to the display device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device could not be reached at all.
    #[error("Display at {address} is offline: {reason}")]
    Offline { address: String, reason: String },

    /// The device answered with an error or the request failed mid-flight.
    #[error("Display request failed: {0}")]
    Http(String),

    /// The device response could not be decoded.
    #[error("Failed to parse display response: {0}")]
    InvalidResponse(String),
}

/// Status reported by the device health check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    /// Firmware version.
    pub version: Option<String>,
    /// Seconds since boot.
    pub uptime: Option<u64>,
    /// Currently shown app.
    pub app: Option<String>,
    /// WiFi RSSI in dBm.
    pub wifi_signal: Option<i32>,
}

/// Async transport to the pixel display.
pub trait DisplayDevice: Send + Sync {
    /// Query device status. Fails with [`DeviceError::Offline`] if unreachable.
    fn health_check(&self) -> impl Future<Output = Result<DeviceInfo, DeviceError>> + Send;

    /// Create or replace the named custom app.
    fn update_custom(
        &self,
        app: &str,
        payload: &CustomPayload,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Remove the named custom app.
    fn clear_custom(&self, app: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Enable or disable the device's built-in apps (clock, date, sensors).
    fn set_native_apps(&self, enabled: bool) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

/// AWTRIX 3 client over HTTP.
pub struct AwtrixClient {
    /// Base URL, e.g. `http://192.168.1.50`.
    base_url: String,

    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,
}

impl AwtrixClient {
    /// Create a client for a device address (`host`, `host:port` or full URL).
    pub fn new(address: &str) -> Result<Self, DeviceError> {
        Self::with_timeout(address, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(address: &str, timeout: Duration) -> Result<Self, DeviceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeviceError::Http(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(address),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> DeviceError {
        if e.is_connect() || e.is_timeout() {
            DeviceError::Offline {
                address: self.base_url.clone(),
                reason: e.to_string(),
            }
        } else {
            DeviceError::Http(e.to_string())
        }
    }

    async fn post(&self, request: reqwest::RequestBuilder) -> Result<(), DeviceError> {
        request
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?
            .error_for_status()
            .map_err(|e| DeviceError::Http(e.to_string()))?;
        Ok(())
    }
}

impl DisplayDevice for AwtrixClient {
    async fn health_check(&self) -> Result<DeviceInfo, DeviceError> {
        let response = self
            .http
            .get(self.url("/api/stats"))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?
            .error_for_status()
            .map_err(|e| DeviceError::Http(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeviceError::Http(e.to_string()))?;

        let info: DeviceInfo = serde_json::from_slice(&bytes)
            .map_err(|e| DeviceError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            device = %self.base_url,
            version = info.version.as_deref().unwrap_or("unknown"),
            "Display health check passed"
        );

        Ok(info)
    }

    async fn update_custom(&self, app: &str, payload: &CustomPayload) -> Result<(), DeviceError> {
        let request = self
            .http
            .post(self.url("/api/custom"))
            .query(&[("name", app)])
            .json(payload);
        self.post(request).await
    }

    async fn clear_custom(&self, app: &str) -> Result<(), DeviceError> {
        // An empty body removes the app
        let request = self
            .http
            .post(self.url("/api/custom"))
            .query(&[("name", app)]);
        self.post(request).await
    }

    async fn set_native_apps(&self, enabled: bool) -> Result<(), DeviceError> {
        let mut settings = serde_json::Map::new();
        for key in NATIVE_APP_KEYS {
            settings.insert(key.to_string(), json!(enabled));
        }
        let request = self
            .http
            .post(self.url("/api/settings"))
            .json(&settings);
        self.post(request).await
    }
}

/// Add a scheme if missing and drop trailing slashes.
fn normalize_base_url(address: &str) -> String {
    let trimmed = address.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("192.168.1.50"), "http://192.168.1.50");
        assert_eq!(normalize_base_url("awtrix.local:8080/"), "http://awtrix.local:8080");
        assert_eq!(normalize_base_url("https://clock.example"), "https://clock.example");
    }

    #[test]
    fn test_client_creation() {
        let client = AwtrixClient::new("192.168.1.50").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.50");
        assert_eq!(client.url("/api/stats"), "http://192.168.1.50/api/stats");
    }

    #[test]
    fn test_device_info_deserialize_ignores_extra_fields() {
        let json = r#"{
            "bat": 100,
            "lux": 12,
            "version": "0.96",
            "wifi_signal": -58,
            "ram": 150000,
            "uptime": 86400,
            "app": "Time"
        }"#;

        let info: DeviceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.version.as_deref(), Some("0.96"));
        assert_eq!(info.uptime, Some(86400));
        assert_eq!(info.wifi_signal, Some(-58));
    }
}
