//! Current weather reading shown next to the floor plan.

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

pub const DEFAULT_WEATHER_URL: &str = "https://api.weatherapi.com/v1/current.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherSettings {
    pub url: String,
    /// Read from configuration or `OCCUPANCY_WEATHER_API_KEY`; the feed is
    /// skipped without one.
    pub api_key: Option<String>,
    pub location: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEATHER_URL.into(),
            api_key: None,
            location: "Stockholm".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherCondition {
    pub code: i64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentWeather {
    pub temp_c: f64,
    #[serde(default)]
    pub condition: Option<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    current: CurrentWeather,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WeatherIcon {
    Sunny,
    Cloudy,
    Rain,
    Snow,
}

impl WeatherIcon {
    /// Condition code ranges: `[1000,1003)` sunny, `[1003,1063)` cloudy,
    /// `[1063,1200)` rain, `[1200,1300)` snow. Anything else is sunny.
    pub fn from_code(code: i64) -> Self {
        match code {
            1000..=1002 => WeatherIcon::Sunny,
            1003..=1062 => WeatherIcon::Cloudy,
            1063..=1199 => WeatherIcon::Rain,
            1200..=1299 => WeatherIcon::Snow,
            _ => WeatherIcon::Sunny,
        }
    }

    pub fn for_condition(condition: Option<&WeatherCondition>) -> Self {
        condition.map_or(WeatherIcon::Sunny, |c| WeatherIcon::from_code(c.code))
    }
}

impl CurrentWeather {
    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::for_condition(self.condition.as_ref())
    }
}

pub async fn fetch_current(
    client: &reqwest::Client,
    settings: &WeatherSettings,
) -> Result<CurrentWeather, FeedError> {
    let api_key = settings
        .api_key
        .as_deref()
        .ok_or(FeedError::NotConfigured("weather api key"))?;

    let resp = client
        .get(&settings.url)
        .query(&[
            ("key", api_key),
            ("q", settings.location.as_str()),
            ("aqi", "no"),
        ])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FeedError::status(&settings.url, status.as_u16()));
    }

    let body: WeatherResponse = resp.json().await.map_err(FeedError::decode)?;
    Ok(body.current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve_once, serve_once_with_type};

    #[test]
    fn icon_ranges() {
        assert_eq!(WeatherIcon::from_code(999), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::from_code(1000), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::from_code(1003), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::from_code(1062), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::from_code(1063), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::from_code(1199), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::from_code(1200), WeatherIcon::Snow);
        assert_eq!(WeatherIcon::from_code(1299), WeatherIcon::Snow);
        assert_eq!(WeatherIcon::from_code(1300), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::for_condition(None), WeatherIcon::Sunny);
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let result = fetch_current(&reqwest::Client::new(), &WeatherSettings::default()).await;
        assert!(matches!(result, Err(FeedError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn decodes_current_conditions() {
        let url = serve_once_with_type(
            200,
            "application/json",
            r#"{"location":{"name":"Stockholm"},"current":{"temp_c":-2.5,"condition":{"text":"Light snow","code":1213}}}"#,
        )
        .await;
        let settings = WeatherSettings {
            url,
            api_key: Some("test-key".into()),
            ..WeatherSettings::default()
        };

        let weather = fetch_current(&reqwest::Client::new(), &settings).await.unwrap();
        assert_eq!(weather.temp_c, -2.5);
        assert_eq!(weather.icon(), WeatherIcon::Snow);
        assert_eq!(weather.condition.unwrap().text, "Light snow");
    }

    #[tokio::test]
    async fn malformed_payload_is_decode_error() {
        let url = serve_once_with_type(200, "application/json", r#"{"error":"bad key"}"#).await;
        let settings = WeatherSettings {
            url,
            api_key: Some("test-key".into()),
            ..WeatherSettings::default()
        };

        let result = fetch_current(&reqwest::Client::new(), &settings).await;
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }

    #[tokio::test]
    async fn failures_never_print_api_key() {
        let url = serve_once(401, "invalid key").await;
        let settings = WeatherSettings {
            url,
            api_key: Some("k3y-s3cr3t".into()),
            ..WeatherSettings::default()
        };
        let err = fetch_current(&reqwest::Client::new(), &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 401, .. }));
        assert!(!err.to_string().contains("k3y-s3cr3t"));

        let closed = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let settings = WeatherSettings {
            url: format!("http://{closed}/v1/current.json"),
            api_key: Some("k3y-s3cr3t".into()),
            ..WeatherSettings::default()
        };
        let err = fetch_current(&reqwest::Client::new(), &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Network(_)));
        assert!(!err.to_string().contains("k3y-s3cr3t"));
    }
}
