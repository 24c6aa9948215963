//! Boundary document: the GeoJSON the map draws.
//!
//! K_i: Built only from a resolved [`RegionTable`], one feature per region,
//! carrying the same identifier the table uses. Regenerating the table means
//! regenerating this document; there is no independent constructor.

use super::region::{KeyScheme, RegionTable};
use geo_types::{LineString, MultiPolygon};
use serde::Serialize;

/// GeoJSON FeatureCollection of county boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryDocument {
    #[serde(rename = "type")]
    kind: &'static str,

    /// Property path matching `features[*]` to table identifiers
    pub feature_id_key: &'static str,

    pub features: Vec<BoundaryFeature>,
}

/// One county feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryFeature {
    #[serde(rename = "type")]
    kind: &'static str,

    /// Region identifier (same value as the table's unique key)
    pub id: String,

    pub properties: BoundaryProperties,

    pub geometry: MultiPolygonGeometry,
}

/// Feature properties; `County_ID` appears only under the synthesized scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryProperties {
    #[serde(rename = "County")]
    pub county: String,

    #[serde(rename = "County_ID", skip_serializing_if = "Option::is_none")]
    pub county_id: Option<String>,
}

/// GeoJSON `MultiPolygon` geometry object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiPolygonGeometry {
    #[serde(rename = "type")]
    kind: &'static str,

    pub coordinates: Vec<Vec<Vec<[f64; 2]>>>,
}

impl From<&MultiPolygon<f64>> for MultiPolygonGeometry {
    fn from(mp: &MultiPolygon<f64>) -> Self {
        let ring = |ls: &LineString<f64>| ls.coords().map(|c| [c.x, c.y]).collect::<Vec<_>>();
        let coordinates = mp
            .iter()
            .map(|poly| {
                std::iter::once(poly.exterior())
                    .chain(poly.interiors().iter())
                    .map(ring)
                    .collect()
            })
            .collect();
        Self {
            kind: "MultiPolygon",
            coordinates,
        }
    }
}

impl BoundaryDocument {
    /// Build the document from a resolved table.
    pub fn from_table(table: &RegionTable) -> Self {
        let scheme = table.key_scheme();
        let features = table
            .regions()
            .iter()
            .map(|region| BoundaryFeature {
                kind: "Feature",
                id: region.id.clone(),
                properties: BoundaryProperties {
                    county: region.county.clone(),
                    county_id: match scheme {
                        KeyScheme::Natural => None,
                        KeyScheme::Synthesized => Some(region.id.clone()),
                    },
                },
                geometry: MultiPolygonGeometry::from(&region.geometry),
            })
            .collect();

        Self {
            kind: "FeatureCollection",
            feature_id_key: scheme.feature_id_key(),
            features,
        }
    }

    /// Document with no features, paired with the empty table.
    pub fn empty() -> Self {
        Self::from_table(&RegionTable::empty())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Find the feature for a region identifier.
    pub fn feature(&self, id: &str) -> Option<&BoundaryFeature> {
        self.features.iter().find(|f| f.id == id)
    }
}
