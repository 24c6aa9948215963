//! Raw GeoJSON shapes and their conversion to `geo-types`.
//!
//! Only the parts of RFC 7946 the dashboard needs are modelled: a
//! FeatureCollection of features with free-form properties, the legacy
//! `crs` member, and Polygon / MultiPolygon geometry.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level GeoJSON object as found on disk.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCollection {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub crs: Option<RawCrs>,

    #[serde(default)]
    pub features: Vec<RawFeature>,
}

/// Legacy named CRS member (`{"type": "name", "properties": {"name": ...}}`).
#[derive(Debug, Deserialize)]
pub(crate) struct RawCrs {
    #[serde(default)]
    pub properties: Option<RawCrsProperties>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCrsProperties {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawCollection {
    /// Declared CRS name, if any.
    pub fn crs_name(&self) -> Option<&str> {
        self.crs
            .as_ref()
            .and_then(|c| c.properties.as_ref())
            .and_then(|p| p.name.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    pub geometry: Option<Value>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl RawFeature {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(name))
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .as_ref()
            .is_some_and(|p| p.contains_key(name))
    }
}

/// Outcome of reading one feature's geometry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedGeometry {
    Polygonal(MultiPolygon<f64>),
    /// `null` or absent geometry
    Missing,
    /// Non-polygonal type or malformed coordinates
    Unusable(String),
}

type Ring = Vec<Vec<f64>>;

/// Convert a GeoJSON geometry object into a multipolygon.
pub(crate) fn parse_geometry(value: Option<&Value>) -> ParsedGeometry {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return ParsedGeometry::Missing;
    };
    let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
    let coordinates = value.get("coordinates").cloned().unwrap_or(Value::Null);

    let polygons: Result<Vec<Polygon<f64>>, String> = match kind {
        "Polygon" => serde_json::from_value::<Vec<Ring>>(coordinates)
            .map_err(|e| e.to_string())
            .and_then(|rings| polygon(&rings).map(|p| vec![p])),
        "MultiPolygon" => serde_json::from_value::<Vec<Vec<Ring>>>(coordinates)
            .map_err(|e| e.to_string())
            .and_then(|polys| polys.iter().map(|rings| polygon(rings)).collect()),
        other => return ParsedGeometry::Unusable(format!("unsupported geometry type '{other}'")),
    };

    match polygons {
        Ok(polys) => ParsedGeometry::Polygonal(MultiPolygon::new(polys)),
        Err(reason) => ParsedGeometry::Unusable(reason),
    }
}

fn polygon(rings: &[Ring]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|r| line_string(r));
    let exterior = rings
        .next()
        .transpose()?
        .ok_or_else(|| "polygon without exterior ring".to_string())?;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn line_string(positions: &[Vec<f64>]) -> Result<LineString<f64>, String> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
            _ => Err(format!("invalid position {p:?}")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
