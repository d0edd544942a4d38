use thiserror::Error;

/// Failures while fetching a page of the city catalog.
///
/// An empty page is not an error; it is how the catalog signals the end of data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("city catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("city catalog request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse city catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while fetching current conditions or the forecast.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(
        "no OpenWeather API key configured.\n\
         Hint: run `cityweather configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,

    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse weather JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather response is missing field `{0}`")]
    MissingField(&'static str),
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
