use foundation::math::CelestialPoint;
use serde_json::{Map, Value};

use crate::object_type::ObjectType;

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(CelestialPoint),
    LineString(Vec<CelestialPoint>),
    MultiLineString(Vec<Vec<CelestialPoint>>),
    Polygon(Vec<Vec<CelestialPoint>>),
}

impl FeatureGeometry {
    pub fn point(&self) -> Option<CelestialPoint> {
        match self {
            FeatureGeometry::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Every polyline (or ring) of the geometry; a point yields nothing.
    pub fn lines(&self) -> Vec<&[CelestialPoint]> {
        match self {
            FeatureGeometry::Point(_) => Vec::new(),
            FeatureGeometry::LineString(line) => vec![line.as_slice()],
            FeatureGeometry::MultiLineString(lines) | FeatureGeometry::Polygon(lines) => {
                lines.iter().map(Vec::as_slice).collect()
            }
        }
    }
}

/// A catalog entry as loaded from a FeatureCollection. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFeature {
    pub id: String,
    pub object_type: ObjectType,
    pub geometry: FeatureGeometry,
    pub magnitude: f64,
    /// `[major, minor]` apparent size.
    pub size: Option<[f64; 2]>,
    /// Position angle in degrees.
    pub angle: Option<f64>,
    pub name: Option<String>,
}

impl CatalogFeature {
    pub fn point(
        id: impl Into<String>,
        object_type: ObjectType,
        position: CelestialPoint,
        magnitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            object_type,
            geometry: FeatureGeometry::Point(position),
            magnitude,
            size: None,
            angle: None,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_size(mut self, major: f64, minor: f64) -> Self {
        self.size = Some([major, minor]);
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn size_major(&self) -> Option<f64> {
        self.size.map(|[a, b]| a.max(b))
    }

    pub fn size_minor(&self) -> Option<f64> {
        self.size.map(|[a, b]| a.min(b))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<CatalogFeature>,
    /// Features left out: types the chart does not draw and malformed entries.
    pub skipped: usize,
    /// Why each malformed feature was left out.
    pub invalid: Vec<CatalogChunkError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChunkError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for CatalogChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogChunkError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            CatalogChunkError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            CatalogChunkError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for CatalogChunkError {}

impl FeatureCollection {
    pub fn new(features: Vec<CatalogFeature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parses a catalog payload. `default_type` applies to features that
    /// carry no `type` property (the constellation catalog omits it).
    pub fn from_geojson_str(
        payload: &str,
        default_type: Option<ObjectType>,
    ) -> Result<Self, CatalogChunkError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| CatalogChunkError::Json(e.to_string()))?;
        Self::from_geojson_value(&value, default_type)
    }

    pub fn from_geojson_value(
        value: &Value,
        default_type: Option<ObjectType>,
    ) -> Result<Self, CatalogChunkError> {
        let obj = value
            .as_object()
            .ok_or(CatalogChunkError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(CatalogChunkError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(CatalogChunkError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(CatalogChunkError::NotAFeatureCollection)?;

        let mut out = FeatureCollection::default();
        out.features.reserve(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(index, feat_val, default_type) {
                Ok(Some(feature)) => out.features.push(feature),
                Ok(None) => out.skipped += 1,
                Err(reason) => {
                    out.skipped += 1;
                    out.invalid
                        .push(CatalogChunkError::InvalidFeature { index, reason });
                }
            }
        }

        Ok(out)
    }
}

fn parse_feature(
    index: usize,
    value: &Value,
    default_type: Option<ObjectType>,
) -> Result<Option<CatalogFeature>, String> {
    let feat_obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let empty = Map::new();
    let props = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .unwrap_or(&empty);

    let object_type = match props.get("type") {
        Some(Value::String(name)) => match ObjectType::from_catalog_name(name) {
            Some(ty) => ty,
            None => return Ok(None),
        },
        Some(_) => return Err("object type must be a string".to_string()),
        None => default_type.ok_or("feature missing object type".to_string())?,
    };

    let id = value_as_id(props.get("id"))
        .or_else(|| value_as_id(feat_obj.get("id")))
        .unwrap_or_else(|| format!("{}-{index}", object_type.class_name()));

    let magnitude = match props.get("magnitude") {
        Some(v) => v.as_f64().ok_or("magnitude must be a number".to_string())?,
        None if object_type == ObjectType::Constellation => 0.0,
        None => return Err("feature missing magnitude".to_string()),
    };

    let size = match props.get("size") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_size(v)?),
    };

    let angle = match props.get("angle") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_f64().ok_or("angle must be a number".to_string())?),
    };

    let name = props
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let geometry_val = feat_obj
        .get("geometry")
        .ok_or("feature missing geometry".to_string())?;
    let geometry = parse_geometry(geometry_val)?;

    Ok(Some(CatalogFeature {
        id,
        object_type,
        geometry,
        magnitude,
        size,
        angle,
        name,
    }))
}

fn value_as_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_size(value: &Value) -> Result<[f64; 2], String> {
    if let Some(n) = value.as_f64() {
        return Ok([n, n]);
    }
    let arr = value
        .as_array()
        .ok_or("size must be a number or [major, minor]".to_string())?;
    let nums: Vec<f64> = arr.iter().filter_map(Value::as_f64).collect();
    match nums.as_slice() {
        [n] => Ok([*n, *n]),
        [major, minor, ..] => Ok([*major, *minor]),
        _ => Err("size must contain numbers".to_string()),
    }
}

fn parse_geometry(value: &Value) -> Result<FeatureGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(FeatureGeometry::Point(parse_point(coords)?)),
        "LineString" => Ok(FeatureGeometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(FeatureGeometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Ok(FeatureGeometry::Polygon(parse_lines(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<CelestialPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [x, y]".to_string());
    }
    let x = arr[0]
        .as_f64()
        .ok_or("Point x must be a number".to_string())?;
    let y = arr[1]
        .as_f64()
        .ok_or("Point y must be a number".to_string())?;
    if !(-90.0..=90.0).contains(&y) {
        return Err(format!("declination out of range: {y}"));
    }
    Ok(CelestialPoint::from_chart_coordinates(x, y))
}

fn parse_points(coords: &Value) -> Result<Vec<CelestialPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<CelestialPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of lines".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for line in arr {
        out.push(parse_points(line)?);
    }
    Ok(out)
}
