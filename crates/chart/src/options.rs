//! Chart configuration and partial updates.

use catalog::{
    BRIGHT_OBJECTS_LOCATION, CONSTELLATIONS_LOCATION, CatalogSlot, Overrides, STARS_LOCATION,
};
use chrono::{DateTime, Timelike, Utc};
use formats::ObjectType;
use foundation::math::Viewport;
use layers::overlays::OverlayConfig;
use layers::symbology::TypeStyle;
use layers::DEFAULT_MAX_RELAX_PASSES;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observer::{Center, Location, ObserverMode, ObserverState};

pub const DEFAULT_LATITUDE: f64 = 40.7528;
pub const DEFAULT_LONGITUDE: f64 = -73.9765222;
pub const DEFAULT_ZOOM_FACTOR: f64 = 10.0;
pub const DEFAULT_PASSES_PER_TICK: u32 = 25;

#[derive(Debug)]
pub enum OptionsError {
    /// Patches must be JSON objects.
    NotAnObject,
    /// The merged document does not describe a chart (wrong types, bad datetime).
    Malformed(String),
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::NotAnObject => write!(f, "options patch must be a JSON object"),
            OptionsError::Malformed(msg) => write!(f, "malformed options: {msg}"),
            OptionsError::InvalidValue { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for OptionsError {}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> OptionsError {
    OptionsError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

/// One viewport dimension: `640` is pixels, `"50%"` a share of the container.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    pub fn resolve(self, container: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => container * pct / 100.0,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = String;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        let text = match repr {
            LengthRepr::Number(px) => return Ok(Length::Px(px)),
            LengthRepr::Text(text) => text,
        };
        let trimmed = text.trim();
        let (digits, percent) = match trimmed.strip_suffix('%') {
            Some(digits) => (digits, true),
            None => (trimmed.strip_suffix("px").unwrap_or(trimmed), false),
        };
        let value: f64 = digits
            .trim()
            .parse()
            .map_err(|_| format!("{text:?} is neither pixels nor a percentage"))?;
        Ok(if percent {
            Length::Percent(value)
        } else {
            Length::Px(value)
        })
    }
}

impl From<Length> for LengthRepr {
    fn from(length: Length) -> Self {
        match length {
            Length::Px(px) => LengthRepr::Number(px),
            Length::Percent(pct) => LengthRepr::Text(format!("{pct}%")),
        }
    }
}

/// Pixel size of the element the chart is placed in.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ContainerSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeOptions {
    pub width: Length,
    pub height: Length,
    /// Percentages resolve against this.
    pub container: ContainerSize,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            width: Length::Px(800.0),
            height: Length::Px(800.0),
            container: ContainerSize::default(),
        }
    }
}

impl SizeOptions {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width.resolve(self.container.width),
            self.height.resolve(self.container.height),
        )
    }

    fn validate(&self) -> Result<(), OptionsError> {
        for (field, v) in [
            ("size.container.width", self.container.width),
            ("size.container.height", self.container.height),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(field, format!("{v} is not a positive size")));
            }
        }
        for (field, length, container) in [
            ("size.width", self.width, self.container.width),
            ("size.height", self.height, self.container.height),
        ] {
            if let Length::Percent(pct) = length
                && !(pct > 0.0 && pct <= 100.0)
            {
                return Err(invalid(field, format!("{pct}% is outside (0, 100]")));
            }
            let v = length.resolve(container);
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(field, format!("{v} is not a positive size")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomOptions {
    pub enabled: bool,
    /// Maximum zoom relative to the unzoomed chart.
    pub max_factor: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            max_factor: DEFAULT_ZOOM_FACTOR,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarOptions {
    pub sun: bool,
    pub moon: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationOptions {
    pub draw: bool,
    pub label: bool,
}

impl Default for ConstellationOptions {
    fn default() -> Self {
        Self {
            draw: true,
            label: true,
        }
    }
}

/// Catalog locations. An empty location leaves that slot unloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub constellations: String,
    pub objects: String,
    pub stars: String,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            constellations: CONSTELLATIONS_LOCATION.to_string(),
            objects: BRIGHT_OBJECTS_LOCATION.to_string(),
            stars: STARS_LOCATION.to_string(),
        }
    }
}

impl DataSources {
    pub fn location(&self, slot: CatalogSlot) -> &str {
        match slot {
            CatalogSlot::Constellations => &self.constellations,
            CatalogSlot::Objects => &self.objects,
            CatalogSlot::Stars => &self.stars,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationOptions {
    /// Hard cap on label relaxation passes per redraw.
    pub max_passes: u32,
    pub passes_per_tick: u32,
}

impl Default for RelaxationOptions {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_RELAX_PASSES,
            passes_per_tick: DEFAULT_PASSES_PER_TICK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub size: SizeOptions,
    pub scale: f64,
    pub zoom: ZoomOptions,
    pub datetime: DateTime<Utc>,
    pub location: Location,
    /// Fixed celestial center; when set it replaces the location's zenith.
    pub center: Option<Center>,
    pub graticule: bool,
    pub ecliptic: bool,
    pub zenith: bool,
    pub compass: bool,
    pub solar: SolarOptions,
    pub constellations: ConstellationOptions,
    pub stars: TypeStyle,
    pub galaxies: TypeStyle,
    pub open_clusters: TypeStyle,
    pub globular_clusters: TypeStyle,
    pub planetary_nebulas: TypeStyle,
    pub bright_nebulas: TypeStyle,
    pub overrides: Overrides,
    pub data: DataSources,
    pub relaxation: RelaxationOptions,
}

/// Tonight at 22:00 UTC.
fn default_datetime() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_hour(22)
        .and_then(|d| d.with_minute(0))
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(now)
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            size: SizeOptions::default(),
            scale: 1.0,
            zoom: ZoomOptions::default(),
            datetime: default_datetime(),
            location: Location {
                latitude: DEFAULT_LATITUDE,
                longitude: DEFAULT_LONGITUDE,
            },
            center: None,
            graticule: true,
            ecliptic: true,
            zenith: true,
            compass: false,
            solar: SolarOptions::default(),
            constellations: ConstellationOptions::default(),
            stars: TypeStyle::defaults_for(ObjectType::Star),
            galaxies: TypeStyle::defaults_for(ObjectType::Galaxy),
            open_clusters: TypeStyle::defaults_for(ObjectType::OpenCluster),
            globular_clusters: TypeStyle::defaults_for(ObjectType::GlobularCluster),
            planetary_nebulas: TypeStyle::defaults_for(ObjectType::PlanetaryNebula),
            bright_nebulas: TypeStyle::defaults_for(ObjectType::BrightNebula),
            overrides: Overrides::bright_stars(),
            data: DataSources::default(),
            relaxation: RelaxationOptions::default(),
        }
    }
}

/// Objects merge key by key; anything else (including `null`) replaces.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                deep_merge(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

impl ChartOptions {
    /// Defaults with `patch` merged on top.
    pub fn from_json(patch: &Value) -> Result<Self, OptionsError> {
        Self::default().merged(patch)
    }

    /// Validated copy of `self` with `patch` deep-merged in. `self` is left
    /// untouched so a rejected patch changes nothing.
    pub fn merged(&self, patch: &Value) -> Result<Self, OptionsError> {
        if !patch.is_object() {
            return Err(OptionsError::NotAnObject);
        }
        let mut doc =
            serde_json::to_value(self).map_err(|e| OptionsError::Malformed(e.to_string()))?;
        deep_merge(&mut doc, patch);
        let next: ChartOptions =
            serde_json::from_value(doc).map_err(|e| OptionsError::Malformed(e.to_string()))?;
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        self.size.validate()?;
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("scale", format!("{} is not positive", self.scale)));
        }
        if !self.zoom.max_factor.is_finite() || self.zoom.max_factor < 1.0 {
            return Err(invalid(
                "zoom.max_factor",
                format!("{} is below 1", self.zoom.max_factor),
            ));
        }
        self.location.validate()?;
        if let Some(center) = &self.center {
            center.validate()?;
        }
        for (ty, style) in self.type_styles() {
            validate_style(style_key(ty), style)?;
        }
        if self.relaxation.max_passes == 0 {
            return Err(invalid("relaxation.max_passes", "must be at least 1"));
        }
        if self.relaxation.passes_per_tick == 0 {
            return Err(invalid("relaxation.passes_per_tick", "must be at least 1"));
        }
        Ok(())
    }

    /// The configurable star and deep-sky styles.
    pub fn type_styles(&self) -> [(ObjectType, &TypeStyle); 6] {
        [
            (ObjectType::Star, &self.stars),
            (ObjectType::Galaxy, &self.galaxies),
            (ObjectType::OpenCluster, &self.open_clusters),
            (ObjectType::GlobularCluster, &self.globular_clusters),
            (ObjectType::PlanetaryNebula, &self.planetary_nebulas),
            (ObjectType::BrightNebula, &self.bright_nebulas),
        ]
    }

    /// Style for any type; the fixed-size types use their built-in style.
    pub fn style_for(&self, ty: ObjectType) -> TypeStyle {
        self.type_styles()
            .into_iter()
            .find(|(t, _)| *t == ty)
            .map(|(_, s)| *s)
            .unwrap_or_else(|| {
                let mut style = TypeStyle::defaults_for(ty);
                style.visible = match ty {
                    ObjectType::Constellation => self.constellations.draw,
                    ObjectType::Sun => self.solar.sun,
                    ObjectType::Moon => self.solar.moon,
                    _ => style.visible,
                };
                style
            })
    }

    pub fn observer(&self) -> ObserverState {
        let mode = match self.center {
            Some(center) => ObserverMode::Center(center),
            None => ObserverMode::Location(self.location),
        };
        ObserverState {
            datetime: self.datetime,
            mode,
        }
    }

    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            globe: true,
            graticule: self.graticule,
            ecliptic: self.ecliptic,
            zenith: self.zenith,
            compass: self.compass,
        }
    }
}

/// Options key holding the style of `ty`.
pub fn style_key(ty: ObjectType) -> &'static str {
    match ty {
        ObjectType::Star => "stars",
        ObjectType::Galaxy => "galaxies",
        ObjectType::OpenCluster => "open_clusters",
        ObjectType::GlobularCluster => "globular_clusters",
        ObjectType::PlanetaryNebula => "planetary_nebulas",
        ObjectType::BrightNebula => "bright_nebulas",
        ObjectType::Constellation => "constellations",
        ObjectType::Sun => "sun",
        ObjectType::Moon => "moon",
    }
}

fn validate_style(key: &str, style: &TypeStyle) -> Result<(), OptionsError> {
    let field = |name: &str| format!("{key}.{name}");
    if style.magnitude.is_nan() {
        return Err(invalid(field("magnitude"), "is not a number"));
    }
    let ranges = std::iter::once(("scale", style.scale))
        .chain(style.minor_scale.map(|r| ("minor_scale", r)));
    for (name, range) in ranges {
        if range.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(invalid(
                field(name),
                format!("{range:?} must hold two non-negative sizes"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base() -> ChartOptions {
        ChartOptions::from_json(&json!({"datetime": "2024-01-01T03:00:00Z"})).unwrap()
    }

    #[test]
    fn defaults_follow_the_chart_app() {
        let o = base();
        assert_eq!(o.size.viewport(), Viewport::new(800.0, 800.0));
        assert_eq!(o.scale, 1.0);
        assert_eq!(o.location.latitude, DEFAULT_LATITUDE);
        assert_eq!(o.stars.magnitude, 5.0);
        assert_eq!(o.galaxies.scale, [3.0, 10.0]);
        assert_eq!(o.bright_nebulas.magnitude, 10.0);
        assert_eq!(o.data.location(CatalogSlot::Stars), STARS_LOCATION);
        assert_eq!(o.overrides.name_for("HIP91262"), Some("Vega"));
        assert_eq!(o.center, None);
        assert_eq!(o.datetime, Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap());
    }

    #[test]
    fn patch_merges_nested_objects() {
        let o = base()
            .merged(&json!({"stars": {"magnitude": 6.5}, "zoom": {"enabled": true}}))
            .unwrap();
        assert_eq!(o.stars.magnitude, 6.5);
        assert_eq!(o.stars.scale, [6.0, 0.25]);
        assert!(o.zoom.enabled);
        assert_eq!(o.zoom.max_factor, DEFAULT_ZOOM_FACTOR);
    }

    #[test]
    fn overrides_merge_by_id() {
        let o = base()
            .merged(&json!({"overrides": {"M31": {"name": "Andromeda", "show": true}}}))
            .unwrap();
        assert!(o.overrides.always_show("M31"));
        assert_eq!(o.overrides.name_for("HIP32349"), Some("Sirius"));
    }

    #[test]
    fn center_can_be_set_and_cleared() {
        let centered = base().merged(&json!({"center": {"ra": 5.8, "dec": 0.0}})).unwrap();
        assert!(matches!(centered.observer().mode, ObserverMode::Center(_)));
        let cleared = centered.merged(&json!({"center": null})).unwrap();
        assert!(matches!(cleared.observer().mode, ObserverMode::Location(_)));
    }

    #[test]
    fn bad_values_are_rejected() {
        let o = base();
        for patch in [
            json!({"datetime": "not a date"}),
            json!({"location": {"latitude": 91.0}}),
            json!({"center": {"ra": 24.0, "dec": 0.0}}),
            json!({"center": {"ra": 1.0}}),
            json!({"size": {"width": 0.0}}),
            json!({"scale": -1.0}),
            json!({"zoom": {"max_factor": 0.5}}),
            json!({"galaxies": {"scale": [3.0, -1.0]}}),
            json!({"relaxation": {"max_passes": 0}}),
        ] {
            assert!(o.merged(&patch).is_err(), "accepted {patch}");
        }
        assert!(matches!(o.merged(&json!([1, 2])), Err(OptionsError::NotAnObject)));
        let err = o.merged(&json!({"galaxies": {"minor_scale": [1.0, f64::NAN]}}));
        assert!(err.is_err());
    }

    #[test]
    fn error_names_the_field() {
        let err = base()
            .merged(&json!({"location": {"latitude": -100.0}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid location.latitude: -100 is outside [-90, 90]");
    }

    #[test]
    fn size_accepts_a_share_of_the_container() {
        let o = base()
            .merged(&json!({"size": {
                "width": "50%",
                "height": 600,
                "container": {"width": 1200.0, "height": 900.0}
            }}))
            .unwrap();
        assert_eq!(o.size.width, Length::Percent(50.0));
        assert_eq!(o.size.viewport(), Viewport::new(600.0, 600.0));

        // Percentages survive a later unrelated patch.
        let o = o.merged(&json!({"scale": 2.0})).unwrap();
        assert_eq!(o.size.viewport(), Viewport::new(600.0, 600.0));

        let o = o.merged(&json!({"size": {"height": "640px"}})).unwrap();
        assert_eq!(o.size.height, Length::Px(640.0));
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let o = base();
        for patch in [
            json!({"size": {"width": "0%"}}),
            json!({"size": {"height": "half"}}),
            json!({"size": {"container": {"width": -1.0}}}),
        ] {
            assert!(o.merged(&patch).is_err(), "accepted {patch}");
        }
        let err = o.merged(&json!({"size": {"width": "150%"}})).unwrap_err();
        assert_eq!(err.to_string(), "invalid size.width: 150% is outside (0, 100]");
    }

    #[test]
    fn fixed_types_follow_toggles() {
        let o = base()
            .merged(&json!({"solar": {"sun": true}, "constellations": {"draw": false}}))
            .unwrap();
        assert!(o.style_for(ObjectType::Sun).visible);
        assert!(!o.style_for(ObjectType::Moon).visible);
        assert!(!o.style_for(ObjectType::Constellation).visible);
        assert_eq!(o.style_for(ObjectType::OpenCluster), o.open_clusters);
    }

    #[test]
    fn deep_merge_replaces_scalars_and_arrays() {
        let mut doc = json!({"a": {"b": 1, "c": [1, 2]}, "d": true});
        deep_merge(&mut doc, &json!({"a": {"c": [3]}, "e": "x"}));
        assert_eq!(doc, json!({"a": {"b": 1, "c": [3]}, "d": true, "e": "x"}));
    }
}
