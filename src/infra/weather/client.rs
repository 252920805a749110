//! Open-Meteo passthrough client.

use crate::infra::config;

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new() -> Self {
        Self::with_base_url(config::weather_api_url())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetches the current temperature for a coordinate pair.
    ///
    /// Returns a display string: `"{t}°C"` on success, `"N/A"` when the
    /// upstream payload has no current weather, and an error message when
    /// the call itself fails. The upstream being down must never fail a
    /// garden request, so no error escapes here.
    pub async fn garden_temperature(&self, latitude: f64, longitude: f64) -> String {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.base_url, latitude, longitude
        );

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(_) => return "Erro ao obter tempo".to_string(),
        };

        let body: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(_) => return "Erro ao obter tempo".to_string(),
        };

        match body
            .get("current_weather")
            .and_then(|w| w.get("temperature"))
            .and_then(|t| t.as_f64())
        {
            Some(temp) => format!("{}°C", temp),
            None => "N/A".to_string(),
        }
    }
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}
