use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl WeatherQuery {
    /// Query parameters for the provider, without the credential.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            WeatherQuery::City(name) => vec![("q", name.clone())],
        }
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::Coordinates { lat, lon } => write!(f, "({lat}, {lon})"),
            WeatherQuery::City(name) => write!(f, "'{name}'"),
        }
    }
}

/// Current conditions as returned by the provider.
///
/// Only `cod` is required; the provider may omit anything else, so every
/// consumer has to treat `None` as a normal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub cod: i32,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub base: Option<String>,
    pub dt: Option<i64>,
    pub timezone: Option<i32>,
    pub visibility: Option<i32>,
    pub coord: Option<Coord>,
    pub main: Option<MainBlock>,
    pub wind: Option<Wind>,
    pub clouds: Option<Clouds>,
    pub weather: Option<Vec<Condition>>,
    pub sys: Option<Sys>,
}

impl WeatherReading {
    /// The first entry of the condition list.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.as_ref().and_then(|list| list.first())
    }

    pub fn temperature_kelvin(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Temperatures are Kelvin, pressures hPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<i32>,
    pub humidity: Option<i32>,
    pub sea_level: Option<i32>,
    pub grnd_level: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
    pub deg: Option<i32>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: Option<i32>,
}

/// One entry of the `weather` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: Option<i32>,
    pub main: Option<String>,
    pub description: Option<String>,
    /// Short icon code, e.g. `"10d"`.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<i32>,
}

impl Sys {
    pub fn sunrise_utc(&self) -> Option<DateTime<Utc>> {
        self.sunrise.and_then(unix_to_utc)
    }

    pub fn sunset_utc(&self) -> Option<DateTime<Utc>> {
        self.sunset.and_then(unix_to_utc)
    }
}

/// A single position sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_reading_only_needs_cod() {
        let reading: WeatherReading = serde_json::from_str(r#"{"cod":200}"#).unwrap();

        assert_eq!(reading.cod, 200);
        assert!(reading.name.is_none());
        assert!(reading.main.is_none());
        assert!(reading.primary_condition().is_none());
        assert!(reading.temperature_kelvin().is_none());
    }

    #[test]
    fn missing_cod_is_rejected() {
        let err = serde_json::from_str::<WeatherReading>(r#"{"name":"Oslo"}"#).unwrap_err();
        assert!(err.to_string().contains("cod"));
    }

    #[test]
    fn full_reading_parses_and_ignores_unknown_keys() {
        let json = r#"{
            "coord": {"lon": 10.75, "lat": 59.91},
            "weather": [
                {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"},
                {"id": 701, "main": "Mist", "description": "mist", "icon": "50d"}
            ],
            "base": "stations",
            "main": {"temp": 281.4, "feels_like": 279.9, "pressure": 1012, "humidity": 87},
            "visibility": 10000,
            "wind": {"speed": 3.6, "deg": 200},
            "clouds": {"all": 75},
            "dt": 1700000000,
            "sys": {
                "type": 2,
                "id": 2009047,
                "country": "NO",
                "sunrise": 1699944000,
                "sunset": 1699972000
            },
            "timezone": 3600,
            "id": 3143244,
            "name": "Oslo",
            "cod": 200,
            "extra": {"nested": true}
        }"#;

        let reading: WeatherReading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.name.as_deref(), Some("Oslo"));
        assert_eq!(reading.temperature_kelvin(), Some(281.4));
        assert_eq!(reading.primary_condition().and_then(|c| c.icon.as_deref()), Some("10d"));
        let wind = reading.wind.unwrap();
        assert_eq!(wind.speed, Some(3.6));
        assert!(wind.gust.is_none());
        let sys = reading.sys.unwrap();
        assert_eq!(sys.kind, Some(2));
        assert_eq!(sys.sunrise_utc().unwrap().timestamp(), 1_699_944_000);
    }

    #[test]
    fn query_params() {
        let city = WeatherQuery::City("Paris".into());
        assert_eq!(city.params(), vec![("q", "Paris".to_string())]);

        let coords = WeatherQuery::Coordinates { lat: 48.85, lon: 2.35 };
        assert_eq!(
            coords.params(),
            vec![("lat", "48.85".to_string()), ("lon", "2.35".to_string())]
        );
    }
}
