//! Mapping from provider icon codes to bundled SVG assets.

/// The two bundled icon sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IconSet {
    #[default]
    Primary,
    Alternate,
}

impl IconSet {
    pub fn from_alternate_flag(use_alternate: bool) -> Self {
        if use_alternate {
            IconSet::Alternate
        } else {
            IconSet::Primary
        }
    }

    pub fn is_alternate(&self) -> bool {
        matches!(self, IconSet::Alternate)
    }

    pub fn toggled(&self) -> Self {
        match self {
            IconSet::Primary => IconSet::Alternate,
            IconSet::Alternate => IconSet::Primary,
        }
    }

    /// Directory the set's assets live in.
    pub fn asset_dir(&self) -> &'static str {
        match self {
            IconSet::Primary => "weatherIcons",
            IconSet::Alternate => "weatherIconsv2",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconSet::Primary => "primary",
            IconSet::Alternate => "alternate",
        }
    }
}

impl std::fmt::Display for IconSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve an icon code to an asset file name. Unknown codes (including the
/// empty string) resolve to the set's fallback asset.
pub fn resolve_icon_asset(icon_code: &str, set: IconSet) -> &'static str {
    match set {
        IconSet::Primary => primary_asset(icon_code),
        IconSet::Alternate => alternate_asset(icon_code),
    }
}

/// Full relative path of the asset, including the set's directory.
pub fn icon_asset_path(icon_code: &str, set: IconSet) -> String {
    format!("{}/{}", set.asset_dir(), resolve_icon_asset(icon_code, set))
}

fn primary_asset(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "clear_day.svg",
        "01n" => "clear_night.svg",
        "02d" => "partly_cloudy_day.svg",
        "02n" => "partly_cloudy_night.svg",
        "03d" | "03n" => "cloudy.svg",
        "04d" | "04n" => "mostly_cloudy_day.svg",
        "09d" | "09n" => "showers_rain.svg",
        "10d" => "sunny_with_rain_light.svg",
        "10n" => "rain_with_cloudy_light.svg",
        "11d" | "11n" => "isolated_thunderstorms.svg",
        "13d" | "13n" => "heavy_snow.svg",
        "50d" | "50n" => "haze_fog_dust_smoke.svg",
        _ => "unknown.svg",
    }
}

fn alternate_asset(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "Sun.svg",
        "01n" => "Moon.svg",
        "02d" => "Cloud-Sun.svg",
        "02n" => "Cloud-Moon.svg",
        "03d" | "03n" | "04d" | "04n" => "Cloud.svg",
        "09d" | "09n" => "Cloud-Drizzle.svg",
        "10d" => "Cloud-Rain-Sun.svg",
        "10n" => "Cloud-Rain-Moon.svg",
        "11d" | "11n" => "Cloud-Lightning.svg",
        "13d" | "13n" => "Cloud-Snow.svg",
        "50d" | "50n" => "Cloud-Fog.svg",
        _ => "Cloud.svg",
    }
}
