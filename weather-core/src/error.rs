use thiserror::Error;

/// Everything that can go wrong between asking for the weather and having a
/// reading to show.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location permission permanently denied; enable it in the app settings")]
    PermissionDeniedPermanently,

    #[error("Failed to reach the weather provider: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Weather provider request failed with status {status}: {body}")]
    Http { status: reqwest::StatusCode, body: String },

    #[error("Failed to parse weather provider response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("{0}")]
    Unknown(String),
}

/// Failures of a location source.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location service unavailable: {0}")]
    Unavailable(String),

    #[error("Location tracking ended before a position was reported")]
    StreamClosed,

    #[error("Location lookup failed: {0}")]
    Network(#[from] reqwest::Error),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn messages_are_never_empty() {
        let errors = [
            WeatherError::PermissionDenied,
            WeatherError::PermissionDeniedPermanently,
            WeatherError::Http {
                status: reqwest::StatusCode::NOT_FOUND,
                body: String::new(),
            },
            WeatherError::Location(LocationError::StreamClosed),
            WeatherError::Unknown("boom".into()),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
