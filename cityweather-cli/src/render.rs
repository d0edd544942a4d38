//! Plain-text rendering of the two views.

use chrono::NaiveDate;
use cityweather_core::{
    CityLoader, CityRecord, ForecastEntry, LoadState, RequestState, SortKey, WeatherSnapshot,
    assets::{assets_for, DEFAULT_ASSETS},
    format::{format_celsius, format_forecast_date, format_header_date, format_pop, or_na},
};
use std::fmt::Write;

pub fn loading() -> &'static str {
    "Loading..."
}

pub fn city_label(city: &CityRecord) -> String {
    if city.country_name.is_empty() {
        city.name.clone()
    } else {
        format!("{} ({})", city.name, city.country_name)
    }
}

fn header(loader: &CityLoader, key: SortKey) -> String {
    match loader.sort() {
        Some((active, direction)) if active == key => format!("{} {}", key.label(), direction.arrow()),
        _ => key.label().to_string(),
    }
}

/// The directory table with its status lines.
pub fn city_table(loader: &CityLoader) -> String {
    let rows = loader.visible();
    let headers: Vec<String> = SortKey::all().iter().map(|k| header(loader, *k)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for city in &rows {
        for (i, key) in SortKey::all().iter().enumerate() {
            widths[i] = widths[i].max(city.field(*key).chars().count());
        }
    }

    let mut out = String::new();

    if let Some(error) = loader.error() {
        let _ = writeln!(out, "Error: {error}");
    }
    if !loader.search().is_empty() {
        let _ = writeln!(out, "Search: {}", loader.search());
    }

    let _ = writeln!(
        out,
        "{:<w0$}  {:<w1$}  {:<w2$}",
        headers[0],
        headers[1],
        headers[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    );
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 4));

    for city in &rows {
        let _ = writeln!(
            out,
            "{:<w0$}  {:<w1$}  {:<w2$}",
            city.name,
            city.country_name,
            city.timezone,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        );
    }

    let status = match loader.state() {
        LoadState::Loading => " (loading...)",
        LoadState::Exhausted => " (end of list)",
        LoadState::Idle | LoadState::Errored => "",
    };
    let _ = writeln!(
        out,
        "Showing {} of {} cities{status}",
        rows.len(),
        loader.cities().len()
    );

    out
}

/// Current conditions. An errored request shows its message and nothing else.
pub fn weather_card(place: &str, state: &RequestState<WeatherSnapshot>, today: NaiveDate) -> String {
    match state {
        RequestState::NotStarted => String::new(),
        RequestState::Loading => format!("[{}]\n{}\n", DEFAULT_ASSETS.background, loading()),
        RequestState::Errored(message) => format!("[{}]\n{message}\n", DEFAULT_ASSETS.background),
        RequestState::Loaded(snapshot) => snapshot_card(place, snapshot, today),
    }
}

fn snapshot_card(place: &str, snapshot: &WeatherSnapshot, today: NaiveDate) -> String {
    let assets = assets_for(&snapshot.condition);
    let mut out = String::new();

    let _ = writeln!(out, "[{}]", assets.background);
    let _ = writeln!(out, "{place}");
    let _ = writeln!(out, "{}", format_header_date(today));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {}  {}  {}",
        assets.glyph,
        format_celsius(snapshot.temp_k),
        snapshot.condition
    );
    let _ = writeln!(out, "     Max - {}", format_celsius(snapshot.temp_max_k));
    let _ = writeln!(out, "     Min - {}", format_celsius(snapshot.temp_min_k));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Wind {}   Humidity {}   Pressure {}",
        or_na(snapshot.wind_speed_mps, "m/s"),
        or_na(snapshot.humidity_pct, "%"),
        or_na(snapshot.pressure_hpa, "hPa")
    );

    out
}

fn forecast_line(entry: &ForecastEntry) -> String {
    let assets = assets_for(&entry.condition);
    let mut line = format!(
        "{}  {}  {}  {}",
        format_forecast_date(&entry.timestamp),
        assets.glyph,
        entry.condition,
        format_celsius(entry.temp_k)
    );
    if let Some(pop) = entry.pop {
        let _ = write!(line, "  rain {}", format_pop(pop));
    }
    line
}

pub fn forecast(state: &RequestState<Vec<ForecastEntry>>) -> String {
    let body = match state {
        RequestState::NotStarted => return String::new(),
        RequestState::Loading => format!("{}\n", loading()),
        RequestState::Errored(message) => format!("{message}\n"),
        RequestState::Loaded(days) => days.iter().map(|d| forecast_line(d) + "\n").collect(),
    };
    format!("\nForecast\n{body}")
}
