use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the city catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "cou_name_en", default, deserialize_with = "null_as_empty")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timezone: String,
}

impl CityRecord {
    pub fn new(
        name: impl Into<String>,
        country_name: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country_name: country_name.into(),
            timezone: timezone.into(),
        }
    }

    pub fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Name => &self.name,
            SortKey::CountryName => &self.country_name,
            SortKey::Timezone => &self.timezone,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Column a city list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    CountryName,
    Timezone,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "City",
            SortKey::CountryName => "Country",
            SortKey::Timezone => "Timezone",
        }
    }

    pub const fn all() -> &'static [SortKey] {
        &[SortKey::Name, SortKey::CountryName, SortKey::Timezone]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "^",
            SortDirection::Descending => "v",
        }
    }
}

/// Coarse weather category, taken from the provider's `weather[0].main` tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConditionKind {
    Clear,
    Rain,
    Clouds,
    Drizzle,
    /// Any tag without a dedicated asset, or no tag at all (empty string).
    Other(String),
    #[default]
    Unknown,
}

impl ConditionKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Clear" => ConditionKind::Clear,
            "Rain" => ConditionKind::Rain,
            "Clouds" => ConditionKind::Clouds,
            "Drizzle" => ConditionKind::Drizzle,
            "" => ConditionKind::Unknown,
            other => ConditionKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            ConditionKind::Clear => "Clear",
            ConditionKind::Rain => "Rain",
            ConditionKind::Clouds => "Clouds",
            ConditionKind::Drizzle => "Drizzle",
            ConditionKind::Other(tag) => tag,
            ConditionKind::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Current conditions for a place. Temperatures are Kelvin, as delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub condition: ConditionKind,
    pub description: Option<String>,
    pub temp_k: f64,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub humidity_pct: Option<u8>,
    pub pressure_hpa: Option<u32>,
    pub wind_speed_mps: Option<f64>,
}

/// One forecast step.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub condition: ConditionKind,
    pub description: Option<String>,
    pub temp_k: f64,
    pub temp_min_k: Option<f64>,
    pub temp_max_k: Option<f64>,
    /// Probability of precipitation, 0.0..=1.0.
    pub pop: Option<f64>,
}
