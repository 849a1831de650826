//! Display formatting for weather readings. Everything here is pure.

use crate::model::WeatherReading;

/// Placeholder for values the provider did not send.
pub const NOT_AVAILABLE: &str = "N/A";

const KELVIN_OFFSET: f64 = 273.15;

/// Kelvin to a Celsius label with at most one decimal.
///
/// The value is truncated (not rounded) to tenths, and a zero tenths digit
/// is dropped: `300.0` gives `"26.8 °C"`, `293.15` gives `"20 °C"`.
pub fn kelvin_to_celsius_display(kelvin: Option<f64>) -> String {
    let Some(kelvin) = kelvin else {
        return NOT_AVAILABLE.to_string();
    };

    let tenths = ((kelvin - KELVIN_OFFSET) * 10.0) as i64;
    if tenths % 10 == 0 {
        format!("{} °C", tenths / 10)
    } else {
        format!("{:.1} °C", tenths as f64 / 10.0)
    }
}

/// Icons for the provider's condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    FewCloudsDay,
    FewCloudsNight,
    ScatteredClouds,
    BrokenClouds,
    ShowerRain,
    RainDay,
    RainNight,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl WeatherIcon {
    /// Resource name of the bundled image.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Self::ClearDay => "clear_day",
            Self::ClearNight => "clear_night",
            Self::FewCloudsDay => "few_clouds_day",
            Self::FewCloudsNight => "few_clouds_night",
            Self::ScatteredClouds => "scattered_clouds",
            Self::BrokenClouds => "broken_clouds",
            Self::ShowerRain => "shower_rain",
            Self::RainDay => "rain_day",
            Self::RainNight => "rain_night",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Unknown => "unknown",
        }
    }

    /// Single-glyph rendering for text output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::ClearDay => "☀️",
            Self::ClearNight => "🌙",
            Self::FewCloudsDay => "🌤️",
            Self::FewCloudsNight => "☁️",
            Self::ScatteredClouds => "⛅",
            Self::BrokenClouds => "☁️",
            Self::ShowerRain => "🌧️",
            Self::RainDay => "🌦️",
            Self::RainNight => "🌧️",
            Self::Thunderstorm => "⛈️",
            Self::Snow => "❄️",
            Self::Mist => "🌫️",
            Self::Unknown => "❔",
        }
    }
}

/// Map a provider icon code (`"01d"`, `"10n"`, ...) to an icon. Unrecognized
/// codes, including the empty string, map to [`WeatherIcon::Unknown`].
pub fn icon_for(code: &str) -> WeatherIcon {
    match code {
        "01d" => WeatherIcon::ClearDay,
        "01n" => WeatherIcon::ClearNight,
        "02d" => WeatherIcon::FewCloudsDay,
        "02n" => WeatherIcon::FewCloudsNight,
        "03d" | "03n" => WeatherIcon::ScatteredClouds,
        "04d" | "04n" => WeatherIcon::BrokenClouds,
        "09d" | "09n" => WeatherIcon::ShowerRain,
        "10d" => WeatherIcon::RainDay,
        "10n" => WeatherIcon::RainNight,
        "11d" | "11n" => WeatherIcon::Thunderstorm,
        "13d" | "13n" => WeatherIcon::Snow,
        "50d" | "50n" => WeatherIcon::Mist,
        _ => WeatherIcon::Unknown,
    }
}

/// Icon of the reading's primary condition.
pub fn reading_icon(reading: &WeatherReading) -> WeatherIcon {
    icon_for(
        reading
            .primary_condition()
            .and_then(|c| c.icon.as_deref())
            .unwrap_or_default(),
    )
}

pub fn location_label(reading: &WeatherReading) -> String {
    reading.name.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Description of the primary condition, empty when there is none.
pub fn condition_description(reading: &WeatherReading) -> String {
    reading
        .primary_condition()
        .and_then(|c| c.description.clone())
        .unwrap_or_default()
}

pub fn wind_display(reading: &WeatherReading) -> String {
    match reading.wind.and_then(|w| w.speed) {
        Some(speed) => format!("{speed} m/s"),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn humidity_display(reading: &WeatherReading) -> String {
    match reading.main.and_then(|m| m.humidity) {
        Some(humidity) => format!("{humidity} %"),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(json: serde_json::Value) -> WeatherReading {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn absent_temperature_is_not_available() {
        assert_eq!(kelvin_to_celsius_display(None), "N/A");
    }

    #[test]
    fn freezing_point_is_integer_zero() {
        assert_eq!(kelvin_to_celsius_display(Some(273.15)), "0 °C");
    }

    #[test]
    fn tenths_are_truncated_not_rounded() {
        // 26.85 °C
        assert_eq!(kelvin_to_celsius_display(Some(300.0)), "26.8 °C");
    }

    #[test]
    fn whole_degrees_drop_the_decimal() {
        assert_eq!(kelvin_to_celsius_display(Some(293.15)), "20 °C");
        assert_eq!(kelvin_to_celsius_display(Some(310.15)), "37 °C");
    }

    #[test]
    fn below_freezing() {
        // -23.15 °C truncates toward zero
        assert_eq!(kelvin_to_celsius_display(Some(250.0)), "-23.1 °C");
        assert_eq!(kelvin_to_celsius_display(Some(0.0)), "-273.1 °C");
        assert_eq!(kelvin_to_celsius_display(Some(272.65)), "-0.5 °C");
    }

    #[test]
    fn icon_mapping() {
        assert_eq!(icon_for("01d"), WeatherIcon::ClearDay);
        assert_eq!(icon_for("01n"), WeatherIcon::ClearNight);
        assert_eq!(icon_for("04n"), WeatherIcon::BrokenClouds);
        assert_eq!(icon_for("10n"), WeatherIcon::RainNight);
        assert_eq!(icon_for("11d"), WeatherIcon::Thunderstorm);
        assert_eq!(icon_for("50n"), WeatherIcon::Mist);
    }

    #[test]
    fn icon_mapping_is_total() {
        for code in ["", "01", "99d", "01D", "rain", "🌧️"] {
            assert_eq!(icon_for(code), WeatherIcon::Unknown);
        }
        assert_eq!(WeatherIcon::Unknown.asset_name(), "unknown");
    }

    #[test]
    fn full_reading_display() {
        let r = reading(serde_json::json!({
            "cod": 200,
            "name": "Reykjavik",
            "weather": [{"description": "light snow", "icon": "13d"}],
            "main": {"temp": 271.15, "humidity": 93},
            "wind": {"speed": 8.2, "deg": 40}
        }));

        assert_eq!(location_label(&r), "Reykjavik");
        assert_eq!(reading_icon(&r), WeatherIcon::Snow);
        assert_eq!(condition_description(&r), "light snow");
        assert_eq!(wind_display(&r), "8.2 m/s");
        assert_eq!(humidity_display(&r), "93 %");
        assert_eq!(kelvin_to_celsius_display(r.temperature_kelvin()), "-2 °C");
    }

    #[test]
    fn sparse_reading_display() {
        let r = reading(serde_json::json!({"cod": 200, "weather": []}));

        assert_eq!(location_label(&r), "N/A");
        assert_eq!(reading_icon(&r), WeatherIcon::Unknown);
        assert_eq!(condition_description(&r), "");
        assert_eq!(wind_display(&r), "N/A");
        assert_eq!(humidity_display(&r), "N/A");
    }
}
