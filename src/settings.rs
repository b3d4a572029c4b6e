//! Visual preferences
//!
//! Read from the page URL query string (`?quality=low&aim=off`). Nothing is
//! persisted between visits.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 120,
            QualityPreset::High => 256,
        }
    }

    /// Whether to draw the ball's floor shadow
    pub fn shadow_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether to draw the hoop nets
    pub fn net_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Basket particle bursts
    pub particles: bool,
    /// Dashed aim line and power ring while dragging
    pub aim_guide: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            aim_guide: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse a URL query string. Unknown keys and bad values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "quality" => match QualityPreset::from_str(value) {
                    Some(q) => settings.quality = q,
                    None => log::warn!("Unknown quality preset: {value}"),
                },
                "particles" => {
                    if let Some(on) = parse_flag(value) {
                        settings.particles = on;
                    }
                }
                "aim" => {
                    if let Some(on) = parse_flag(value) {
                        settings.aim_guide = on;
                    }
                }
                _ => {}
            }
        }
        settings
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = Self::from_query(&query);
        log::info!("Settings: quality {}", settings.quality.as_str());
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
