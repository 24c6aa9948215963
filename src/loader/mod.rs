//! Geo loader: GeoJSON file → resolved region table + boundary document.
//!
//! Stages (each logs one line):
//! 1. Read and parse the FeatureCollection
//! 2. Normalize the coordinate reference to WGS84
//! 3. Simplify boundaries (topology preserving, fixed tolerance)
//! 4. Coerce catalogued indicator columns to numbers
//! 5. Resolve region identifiers and build the boundary document from the
//!    same resolved table
//!
//! Epistemic foundation:
//! - B_i: File exists and is readable → `LoadError::DataUnavailable`
//! - B_i: File carries polygons and indicator columns → `LoadError::DataCorrupt`
//! - B_i: Natural key column exists → `LoadError::Schema`
//! - K_i: A bad cell or a bad feature never fails the whole load

mod coerce;
mod crs;
mod geojson;

pub use crs::Crs;

use crate::catalog::{self, Indicator};
use crate::models::{BoundaryDocument, LoadError, NATURAL_KEY, Region, RegionTable};
use crate::resolver;
use coerce::{Coerced, coerce};
use geo::{CoordsIter, SimplifyVwPreserve};
use geo_types::MultiPolygon;
use geojson::{ParsedGeometry, RawCollection, RawFeature, parse_geometry};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Boundary simplification tolerance, in degrees.
pub const SIMPLIFY_TOLERANCE: f64 = 0.01;

/// Load the dataset at `path`.
///
/// The returned table is already resolved and the document is built from it,
/// so both use the same identifier scheme.
pub fn load(path: &Path) -> Result<(RegionTable, BoundaryDocument), LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::DataUnavailable {
        path: path.to_owned(),
        source,
    })?;

    let raw: RawCollection = serde_json::from_slice(&bytes)
        .map_err(|e| LoadError::corrupt(path, format!("invalid GeoJSON: {e}")))?;
    if raw.kind != "FeatureCollection" {
        return Err(LoadError::corrupt(
            path,
            format!("expected FeatureCollection, found '{}'", raw.kind),
        ));
    }
    if raw.features.is_empty() {
        return Err(LoadError::corrupt(path, "no features"));
    }
    info!(path = %path.display(), features = raw.features.len(), "Loaded GeoJSON");

    let crs = match raw.crs_name() {
        None => Crs::Wgs84,
        Some(name) => Crs::from_name(name).ok_or_else(|| {
            LoadError::corrupt(path, format!("unsupported coordinate reference '{name}'"))
        })?,
    };

    let geometries = boundaries(&raw.features, crs, path)?;
    let table = attributes(&raw.features, geometries, path)?;

    let table = resolver::resolve(table).map_err(|source| LoadError::Schema {
        path: path.to_owned(),
        source,
    })?;
    let document = BoundaryDocument::from_table(&table);
    info!(
        regions = table.len(),
        feature_id_key = document.feature_id_key,
        "Built region table and boundary document"
    );

    Ok((table, document))
}

/// Parse, reproject and simplify every feature's boundary.
///
/// Features without usable polygons keep an empty boundary so rows stay
/// aligned with their attributes.
fn boundaries(
    features: &[RawFeature],
    crs: Crs,
    path: &Path,
) -> Result<Vec<MultiPolygon<f64>>, LoadError> {
    let mut missing = 0usize;
    let mut unusable = 0usize;

    let parsed: Vec<MultiPolygon<f64>> = features
        .iter()
        .enumerate()
        .map(|(idx, feature)| match parse_geometry(feature.geometry.as_ref()) {
            ParsedGeometry::Polygonal(mp) => mp,
            ParsedGeometry::Missing => {
                missing += 1;
                MultiPolygon::new(vec![])
            }
            ParsedGeometry::Unusable(reason) => {
                debug!(feature = idx, %reason, "Skipping feature geometry");
                unusable += 1;
                MultiPolygon::new(vec![])
            }
        })
        .collect();

    if missing + unusable == features.len() {
        return Err(LoadError::corrupt(path, "no usable polygon geometry"));
    }
    if missing + unusable > 0 {
        warn!(missing, unusable, "Some features have no usable boundary");
    }

    let projected: Vec<MultiPolygon<f64>> = if crs.needs_conversion() {
        let out = parsed.iter().map(|mp| crs.to_wgs84(mp)).collect();
        info!(from = ?crs, "CRS converted to EPSG:4326");
        out
    } else {
        debug!(crs = ?crs, "CRS already geographic, no conversion");
        parsed
    };

    // Visvalingam-Whyatt thresholds on triangle area, hence the square.
    let epsilon = SIMPLIFY_TOLERANCE * SIMPLIFY_TOLERANCE;
    let before: usize = projected.iter().map(|mp| mp.coords_count()).sum();
    let simplified: Vec<MultiPolygon<f64>> = projected
        .iter()
        .map(|mp| mp.simplify_vw_preserve(&epsilon))
        .collect();
    let after: usize = simplified.iter().map(|mp| mp.coords_count()).sum();
    info!(
        tolerance = SIMPLIFY_TOLERANCE,
        vertices_before = before,
        vertices_after = after,
        "Geometry simplified"
    );

    Ok(simplified)
}

/// Build the unresolved region table from feature properties.
fn attributes(
    features: &[RawFeature],
    geometries: Vec<MultiPolygon<f64>>,
    path: &Path,
) -> Result<RegionTable, LoadError> {
    let columns: BTreeSet<Indicator> = catalog::indicators()
        .into_iter()
        .filter(|indicator| features.iter().any(|f| f.has_property(indicator.name())))
        .collect();
    if columns.is_empty() {
        return Err(LoadError::corrupt(path, "no indicator columns"));
    }
    let has_natural_key = features.iter().any(|f| f.has_property(NATURAL_KEY));

    let mut coerced = 0usize;
    let regions = features
        .iter()
        .zip(geometries)
        .map(|(feature, geometry)| {
            let mut region = Region::new(natural_key(feature.property(NATURAL_KEY)), geometry);
            for indicator in &columns {
                let cell = coerce(feature.property(indicator.name()));
                if cell == Coerced::Invalid {
                    coerced += 1;
                }
                region.set_value(*indicator, cell.value());
            }
            region
        })
        .collect();

    info!(
        columns = columns.len(),
        coerced_to_missing = coerced,
        "Converted indicator columns to numeric"
    );
    Ok(RegionTable::new(regions, columns, has_natural_key))
}

fn natural_key(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyScheme, LoadErrorKind};
    use serde_json::json;
    use tempfile::TempDir;

    fn square(x: f64, y: f64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[x, y], [x + 0.5, y], [x + 0.5, y + 0.5], [x, y + 0.5], [x, y]]]
        })
    }

    fn feature(county: &str, x: f64, props: Value) -> Value {
        let mut properties = props.as_object().cloned().unwrap_or_default();
        properties.insert("County".into(), json!(county));
        json!({"type": "Feature", "geometry": square(x, 35.0), "properties": properties})
    }

    fn write(dir: &TempDir, doc: &Value) -> std::path::PathBuf {
        let path = dir.path().join("counties.geojson");
        std::fs::write(&path, serde_json::to_vec(doc).unwrap()).unwrap();
        path
    }

    fn collection(features: Vec<Value>) -> Value {
        json!({"type": "FeatureCollection", "features": features})
    }

    #[test]
    fn test_load_builds_table_and_document() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            &collection(vec![
                feature("Wake", -79.0, json!({"% Uninsured": 9.5, "Life Expectancy": "80.1", "Notes": "x"})),
                feature("Durham", -78.0, json!({"% Uninsured": "n/a", "Life Expectancy": null})),
            ]),
        );

        let (table, doc) = load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.key_scheme(), KeyScheme::Natural);

        let uninsured = Indicator::lookup("% Uninsured").unwrap();
        let life = Indicator::lookup("Life Expectancy").unwrap();
        assert!(table.has_column(uninsured));
        assert!(table.has_column(life));
        assert_eq!(table.columns().count(), 2);

        let wake = table.get("Wake").unwrap();
        assert_eq!(wake.get(uninsured), Some(9.5));
        assert_eq!(wake.get(life), Some(80.1));
        let durham = table.get("Durham").unwrap();
        assert_eq!(durham.get(uninsured), None);
        assert_eq!(durham.get(life), None);

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.features[0].id, "Wake");
        assert_eq!(doc.feature_id_key, "properties.County");
    }

    #[test]
    fn test_duplicate_counties_resolved_in_lockstep() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            &collection(vec![
                feature("Wake", -80.0, json!({"% Rural": 10})),
                feature("Durham", -79.0, json!({"% Rural": 20})),
                feature("Orange", -78.0, json!({"% Rural": 30})),
                feature("Wake", -77.0, json!({"% Rural": 40})),
            ]),
        );

        let (table, doc) = load(&path).unwrap();
        let table_ids: Vec<_> = table.regions().iter().map(|r| r.id.clone()).collect();
        let doc_ids: Vec<_> = doc.features.iter().map(|f| f.id.clone()).collect();
        assert_eq!(table_ids, vec!["Wake_0", "Durham_1", "Orange_2", "Wake_3"]);
        assert_eq!(table_ids, doc_ids);
        assert_eq!(doc.feature_id_key, "properties.County_ID");
        assert_eq!(doc.features[3].properties.county_id.as_deref(), Some("Wake_3"));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("nope.geojson")).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::DataUnavailable);
    }

    #[test]
    fn test_corrupt_inputs() {
        let dir = TempDir::new().unwrap();
        let cases = vec![
            json!({"type": "Feature"}),
            collection(vec![]),
            collection(vec![json!({"type": "Feature", "geometry": null, "properties": {"County": "Wake", "% Rural": 1}})]),
            collection(vec![feature("Wake", -79.0, json!({"Unrelated": 1}))]),
            json!({
                "type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "EPSG:32617"}},
                "features": [feature("Wake", -79.0, json!({"% Rural": 1}))]
            }),
        ];
        for doc in cases {
            let path = write(&dir, &doc);
            let err = load(&path).unwrap_err();
            assert_eq!(err.kind(), LoadErrorKind::DataCorrupt, "{doc}");
        }

        let path = dir.path().join("garbage.geojson");
        std::fs::write(&path, b"\xff\xfe not json").unwrap();
        assert_eq!(load(&path).unwrap_err().kind(), LoadErrorKind::DataCorrupt);
    }

    #[test]
    fn test_missing_county_column_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            &collection(vec![json!({
                "type": "Feature",
                "geometry": square(-79.0, 35.0),
                "properties": {"% Rural": 12.0}
            })]),
        );
        let err = load(&path).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::SchemaError);
    }

    #[test]
    fn test_web_mercator_input_is_reprojected() {
        let dir = TempDir::new().unwrap();
        let ring = json!([[
            [-8_800_000.0, 4_250_000.0],
            [-8_700_000.0, 4_250_000.0],
            [-8_700_000.0, 4_300_000.0],
            [-8_800_000.0, 4_300_000.0],
            [-8_800_000.0, 4_250_000.0]
        ]]);
        let path = write(
            &dir,
            &json!({
                "type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}},
                "features": [{
                    "type": "Feature",
                    "geometry": {"type": "Polygon", "coordinates": ring},
                    "properties": {"County": "Wake", "% Rural": 5}
                }]
            }),
        );

        let (table, _) = load(&path).unwrap();
        let region = table.get("Wake").unwrap();
        for coord in region.geometry.coords_iter() {
            assert!((-80.0..-77.0).contains(&coord.x), "lon {}", coord.x);
            assert!((35.0..37.0).contains(&coord.y), "lat {}", coord.y);
        }
    }

    #[test]
    fn test_simplification_drops_near_collinear_vertices() {
        let dir = TempDir::new().unwrap();
        // a 1x1 degree square with a tiny bump on the south edge
        let ring = json!([[
            [-79.0, 35.0],
            [-78.5, 35.0001],
            [-78.0, 35.0],
            [-78.0, 36.0],
            [-79.0, 36.0],
            [-79.0, 35.0]
        ]]);
        let path = write(
            &dir,
            &collection(vec![json!({
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": ring},
                "properties": {"County": "Wake", "% Rural": 5}
            })]),
        );

        let (table, _) = load(&path).unwrap();
        assert_eq!(table.get("Wake").unwrap().geometry.coords_count(), 5);
    }

    #[test]
    fn test_natural_key_rendering() {
        assert_eq!(natural_key(Some(&json!("Wake"))), "Wake");
        assert_eq!(natural_key(Some(&json!(37183))), "37183");
        assert_eq!(natural_key(Some(&Value::Null)), "");
        assert_eq!(natural_key(None), "");
    }
}
