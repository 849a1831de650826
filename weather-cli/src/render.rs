use chrono::{DateTime, Local, Utc};
use weather_core::{
    WeatherReading,
    format::{
        condition_description, humidity_display, kelvin_to_celsius_display, location_label,
        reading_icon, wind_display,
    },
};

/// Human-readable block for a successful reading.
pub fn render(reading: &WeatherReading) -> String {
    let mut place = location_label(reading);
    if let Some(country) = reading.sys.as_ref().and_then(|s| s.country.as_deref()) {
        place = format!("{place}, {country}");
    }

    let mut lines = vec![
        format!("{}  {place}", reading_icon(reading).glyph()),
        String::new(),
        format!("  {}", kelvin_to_celsius_display(reading.temperature_kelvin())),
    ];

    let description = condition_description(reading);
    if !description.is_empty() {
        lines.push(format!("  {description}"));
    }

    lines.push(String::new());
    lines.push(format!("  Wind     : {}", wind_display(reading)));
    lines.push(format!("  Humidity : {}", humidity_display(reading)));

    if let Some(sys) = &reading.sys {
        if let (Some(sunrise), Some(sunset)) = (sys.sunrise_utc(), sys.sunset_utc()) {
            lines.push(format!(
                "  Sun      : {} - {}",
                local_time(sunrise),
                local_time(sunset)
            ));
        }
    }

    lines.join("\n")
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(json: serde_json::Value) -> WeatherReading {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn renders_full_reading() {
        let out = render(&reading(serde_json::json!({
            "cod": 200,
            "name": "Lisbon",
            "sys": {"country": "PT", "sunrise": 1700000000, "sunset": 1700036000},
            "weather": [{"description": "clear sky", "icon": "01d"}],
            "main": {"temp": 300.0, "humidity": 40},
            "wind": {"speed": 2.5}
        })));

        assert!(out.starts_with("☀️  Lisbon, PT"));
        assert!(out.contains("26.8 °C"));
        assert!(out.contains("clear sky"));
        assert!(out.contains("Wind     : 2.5 m/s"));
        assert!(out.contains("Humidity : 40 %"));
        assert!(out.contains("Sun      : "));
    }

    #[test]
    fn renders_sparse_reading_with_placeholders() {
        let out = render(&reading(serde_json::json!({"cod": 200})));

        assert!(out.starts_with("❔  N/A"));
        assert!(out.contains("  N/A\n"));
        assert!(out.contains("Wind     : N/A"));
        assert!(out.contains("Humidity : N/A"));
        assert!(!out.contains("Sun"));
    }
}
