//! Coordinate reference detection and reprojection to WGS84.

use geo::MapCoords;
use geo_types::{Coord, MultiPolygon};
use std::f64::consts::PI;

/// Sphere radius used by EPSG:3857.
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Coordinate references the loader can normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// EPSG:4326 / OGC CRS84, the target reference
    Wgs84,
    /// EPSG:4269, taken as coincident with WGS84 at map scale
    Nad83,
    /// EPSG:3857 spherical (web) mercator, in metres
    WebMercator,
}

impl Crs {
    /// Parse a GeoJSON CRS name (`EPSG:4326`, `urn:ogc:def:crs:EPSG::3857`,
    /// `urn:ogc:def:crs:OGC:1.3:CRS84`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let code = name.rsplit(':').next().unwrap_or(name).trim();
        match code.to_ascii_uppercase().as_str() {
            "4326" | "CRS84" => Some(Self::Wgs84),
            "4269" | "CRS83" => Some(Self::Nad83),
            "3857" | "3785" | "900913" | "102100" | "102113" => Some(Self::WebMercator),
            _ => None,
        }
    }

    /// Whether coordinates need rewriting to become WGS84 lon/lat.
    pub fn needs_conversion(&self) -> bool {
        matches!(self, Self::WebMercator)
    }

    /// Reproject a boundary from this reference into WGS84.
    pub fn to_wgs84(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        match self {
            Self::Wgs84 | Self::Nad83 => geometry.clone(),
            Self::WebMercator => geometry.map_coords(web_mercator_to_wgs84),
        }
    }
}

fn web_mercator_to_wgs84(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / WEB_MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Coord { x: lon, y: lat }
}
