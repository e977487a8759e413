//! Resolution of visual styles for classified features.
//!
//! A [`StyleConfig`] enumerates overrides keyed by `"<category>"` or
//! `"<category>.<subclass>"`. Resolution merges, in order: the built-in
//! default for the category, the category-level override, the exact subclass
//! override. Resolution is total; a feature always gets a style.

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use crate::classify::{Category, ClassifiedFeature, RoadClass};
use crate::color::Color;

/// Zoom level at which stroke widths and icon sizes are specified.
pub const REFERENCE_ZOOM: f64 = 15.0;

/// Visual rendering parameters of a single feature.
///
/// Styles are immutable value objects, produced once per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Stroke color of lines and outlines.
    pub stroke_color: Color,
    /// Stroke width in pixels at [`REFERENCE_ZOOM`].
    pub stroke_width: f64,
    /// Dash pattern as alternating on/off lengths in pixels. `None` draws a
    /// solid line.
    pub dash_pattern: Option<Vec<f64>>,
    /// Fill color for polygons.
    pub fill_color: Option<Color>,
    /// Name of the icon to place for point features, resolved through the
    /// icon registry.
    pub icon: Option<String>,
}

impl Style {
    /// A solid stroked line without fill or icon.
    pub fn line(stroke_color: Color, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width,
            dash_pattern: None,
            fill_color: None,
            icon: None,
        }
    }

    /// A filled shape outlined with the same color.
    pub fn filled(color: Color, stroke_width: f64) -> Self {
        Self {
            stroke_color: color,
            stroke_width,
            dash_pattern: None,
            fill_color: Some(color),
            icon: None,
        }
    }

    /// Returns a copy with the given fill color.
    pub fn with_fill(mut self, fill_color: Color) -> Self {
        self.fill_color = Some(fill_color);
        self
    }

    /// Returns a copy with the given dash pattern.
    pub fn with_dash(mut self, dash_pattern: Vec<f64>) -> Self {
        self.dash_pattern = Some(dash_pattern);
        self
    }
}

/// Partial style; set fields replace the corresponding fields of the style
/// they are applied over.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StyleOverride {
    /// Overrides [`Style::stroke_color`].
    pub stroke_color: Option<Color>,
    /// Overrides [`Style::stroke_width`].
    pub stroke_width: Option<f64>,
    /// Overrides [`Style::dash_pattern`].
    pub dash_pattern: Option<Vec<f64>>,
    /// Overrides [`Style::fill_color`].
    pub fill_color: Option<Color>,
    /// Overrides [`Style::icon`].
    pub icon: Option<String>,
}

impl StyleOverride {
    fn apply(&self, style: &mut Style) {
        if let Some(color) = self.stroke_color {
            style.stroke_color = color;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
        if let Some(dash) = &self.dash_pattern {
            style.dash_pattern = Some(dash.clone());
        }
        if let Some(fill) = self.fill_color {
            style.fill_color = Some(fill);
        }
        if let Some(icon) = &self.icon {
            style.icon = Some(icon.clone());
        }
    }
}

/// Bounds for zoom-dependent icon sizing, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconSizing {
    /// Icon size at [`REFERENCE_ZOOM`].
    #[serde(default = "default_icon_base")]
    pub base: f64,
    /// Lower clamp of the scaled size.
    #[serde(default = "default_icon_min")]
    pub min: f64,
    /// Upper clamp of the scaled size.
    #[serde(default = "default_icon_max")]
    pub max: f64,
}

fn default_icon_base() -> f64 {
    24.0
}

fn default_icon_min() -> f64 {
    12.0
}

fn default_icon_max() -> f64 {
    96.0
}

impl Default for IconSizing {
    fn default() -> Self {
        Self {
            base: default_icon_base(),
            min: default_icon_min(),
            max: default_icon_max(),
        }
    }
}

/// Externally supplied style configuration.
///
/// Override keys have the form `"road"`, `"road.residential"`,
/// `"metro.Ligne 1"` and so on. Keys with an unrecognized category are
/// ignored with a warning; a malformed style definition never aborts a
/// render.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Style overrides, checked before the built-in defaults.
    #[serde(default)]
    pub overrides: HashMap<String, StyleOverride>,
    /// Canvas background color. White if not set.
    #[serde(default)]
    pub background: Option<Color>,
    /// Icon sizing bounds.
    #[serde(default)]
    pub icon_sizing: IconSizing,
}

const KNOWN_CATEGORY_KEYS: &[&str] = &["road", "water", "metro", "poi", "building", "unknown"];

impl StyleConfig {
    /// Canvas background color.
    pub fn background(&self) -> Color {
        self.background.unwrap_or(Color::WHITE)
    }

    /// Override keys whose category part does not name a known category.
    ///
    /// These keys are skipped during resolution; the compositor reports each
    /// of them as a `StyleOverrideIgnored` warning.
    pub fn unknown_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .overrides
            .keys()
            .filter(|key| {
                let category = key.split('.').next().unwrap_or("");
                !KNOWN_CATEGORY_KEYS.contains(&category)
            })
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn get(&self, key: &str) -> Option<&StyleOverride> {
        self.overrides.get(key)
    }
}

/// Resolves the style of a classified feature against the configuration.
///
/// Precedence, later entries win field-wise: built-in category default,
/// category-level override, exact subclass override. Never fails.
pub fn resolve(feature: &ClassifiedFeature, config: &StyleConfig) -> Style {
    let category = feature.category();
    let mut style = default_style(category);

    if let Some(over) = config.get(category.style_key()) {
        over.apply(&mut style);
    }
    if let Some(subclass) = feature.subclass() {
        let exact = format!("{}.{subclass}", category.style_key());
        if let Some(over) = config.get(&exact) {
            over.apply(&mut style);
        }
    }

    style
}

/// Built-in default style per category.
pub fn default_style(category: Category) -> Style {
    match category {
        Category::Road(class) => default_road_style(class),
        Category::Water => Style::filled(Color::from_hex("#ADD8E6"), 1.0),
        Category::MetroLine => Style::line(Color::from_hex("#FEC8D8"), 2.0),
        Category::Poi => Style::line(Color::from_hex("#C05050"), 1.0),
        Category::Building => {
            Style::line(Color::from_hex("#C5B8AB"), 1.0).with_fill(Color::from_hex("#D9D0C9"))
        }
        Category::Unknown => fallback_style(),
    }
}

/// Generic fallback: a thin gray line, no fill, no icon.
pub fn fallback_style() -> Style {
    Style::line(Color::GRAY, 0.5)
}

fn default_road_style(class: RoadClass) -> Style {
    match class {
        RoadClass::Motorway => Style::line(Color::from_hex("#333333"), 5.0),
        RoadClass::Trunk => Style::line(Color::from_hex("#3C3C3C"), 4.5),
        RoadClass::Primary => Style::line(Color::from_hex("#444444"), 4.0),
        RoadClass::Secondary => Style::line(Color::from_hex("#555555"), 3.0),
        RoadClass::Tertiary => Style::line(Color::from_hex("#666666"), 2.5),
        RoadClass::Residential => Style::line(Color::from_hex("#787878"), 2.0),
        RoadClass::Pedestrian => Style::line(Color::from_hex("#9A9A9A"), 1.5),
        RoadClass::Service => Style::line(Color::from_hex("#999999"), 1.0),
        RoadClass::Path => Style::line(Color::from_hex("#AAAAAA"), 1.0).with_dash(vec![3.0, 2.0]),
        RoadClass::Other => Style::line(Color::from_hex("#888888"), 1.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::element::{GeoElement, Geom};
    use crate::latlon;

    fn road(class: &str) -> ClassifiedFeature {
        classify(GeoElement::new(
            1,
            Geom::Line(vec![latlon!(48.8566, 2.3522), latlon!(48.8570, 2.3530)]),
            [("highway".to_string(), class.to_string())],
        ))
    }

    fn config(json: &str) -> StyleConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn default_config_uses_builtin_styles() {
        let style = resolve(&road("residential"), &StyleConfig::default());
        assert_eq!(style, default_style(Category::Road(RoadClass::Residential)));
    }

    #[test]
    fn subclass_override_beats_category_override() {
        let config = config(
            r##"{
                "overrides": {
                    "road": { "stroke_color": "#111111", "stroke_width": 9.0 },
                    "road.residential": { "stroke_color": "#FF0000" }
                }
            }"##,
        );

        let style = resolve(&road("residential"), &config);
        // Exact subclass override wins for the color it sets...
        assert_eq!(style.stroke_color, Color::from_hex("#FF0000"));
        // ...while fields it leaves unset come from the category override.
        assert_eq!(style.stroke_width, 9.0);

        let other = resolve(&road("primary"), &config);
        assert_eq!(other.stroke_color, Color::from_hex("#111111"));
    }

    #[test]
    fn unknown_category_keys_are_reported_not_fatal() {
        let config = config(
            r##"{
                "overrides": {
                    "roda.residential": { "stroke_width": 3.0 },
                    "water": { "fill_color": "#0000FF" }
                }
            }"##,
        );

        assert_eq!(config.unknown_keys(), vec!["roda.residential".to_string()]);
        // Resolution still works and simply never consults the bad key.
        let style = resolve(&road("residential"), &config);
        assert_eq!(style, default_style(Category::Road(RoadClass::Residential)));
    }

    #[test]
    fn unknown_category_gets_fallback() {
        let feature = classify(GeoElement::new(
            7,
            Geom::Point(latlon!(0.0, 0.0)),
            [("foo".to_string(), "bar".to_string())],
        ));
        let style = resolve(&feature, &StyleConfig::default());
        assert_eq!(style, fallback_style());
        assert!(style.fill_color.is_none());
        assert!(style.icon.is_none());
    }

    #[test]
    fn metro_line_override_by_name() {
        let config = config(
            r##"{
                "overrides": {
                    "metro.Ligne 1": { "stroke_color": "#FFCD00" }
                }
            }"##,
        );
        let feature = classify(GeoElement::new(
            2,
            Geom::Line(vec![latlon!(48.86, 2.34), latlon!(48.87, 2.35)]),
            [
                ("railway".to_string(), "subway".to_string()),
                ("name".to_string(), "Ligne 1".to_string()),
            ],
        ));

        let style = resolve(&feature, &config);
        assert_eq!(style.stroke_color, Color::from_hex("#FFCD00"));
        assert_eq!(style.stroke_width, 2.0);
    }

    #[test]
    fn icon_sizing_defaults() {
        let config = config("{}");
        assert_eq!(config.icon_sizing, IconSizing::default());
        assert_eq!(config.background(), Color::WHITE);
    }
}
