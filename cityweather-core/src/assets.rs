use crate::model::ConditionKind;

/// Display assets for one condition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionAssets {
    pub icon: &'static str,
    pub glyph: &'static str,
    pub background: &'static str,
}

pub const DEFAULT_ASSETS: ConditionAssets = ConditionAssets {
    icon: "sun.png",
    glyph: "·",
    background: "clear.jpg",
};

static ASSET_TABLE: &[(&str, ConditionAssets)] = &[
    (
        "Clear",
        ConditionAssets { icon: "sun.png", glyph: "☀", background: "sunny.jpg" },
    ),
    (
        "Rain",
        ConditionAssets { icon: "rainy-day.png", glyph: "🌧", background: "rain.jpg" },
    ),
    (
        "Clouds",
        ConditionAssets { icon: "cloudy.png", glyph: "☁", background: "cloud.jpg" },
    ),
    (
        "Drizzle",
        ConditionAssets { icon: "drizzle.png", glyph: "🌦", background: "drizzle.jpg" },
    ),
];

/// Look up the assets for a condition; anything unmapped gets [`DEFAULT_ASSETS`].
pub fn assets_for(condition: &ConditionKind) -> ConditionAssets {
    let tag = condition.tag();
    ASSET_TABLE
        .iter()
        .find(|(key, _)| *key == tag)
        .map(|(_, assets)| *assets)
        .unwrap_or(DEFAULT_ASSETS)
}

/// Same as [`assets_for`] for a condition that may be absent.
pub fn assets_for_opt(condition: Option<&ConditionKind>) -> ConditionAssets {
    condition.map(assets_for).unwrap_or(DEFAULT_ASSETS)
}
