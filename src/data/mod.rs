use crate::model::{RegionShape, Ring};
use anyhow::{bail, Context, Result};
use geojson::{GeoJson, Geometry, Value};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Feature property holding the state name in GADM level-1 files
pub const DEFAULT_NAME_PROPERTY: &str = "NAME_1";

/// Load region shapes from a GeoJSON FeatureCollection.
/// Features without a name or without polygon geometry are skipped.
pub fn load_regions(path: &Path, name_property: &str) -> Result<Vec<RegionShape>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read boundaries from {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Invalid GeoJSON in {}", path.display()))?;
    let regions = regions_from_geojson(&geojson, name_property)?;
    debug!("Loaded {} regions from {}", regions.len(), path.display());
    Ok(regions)
}

/// Extract named polygon features
pub fn regions_from_geojson(geojson: &GeoJson, name_property: &str) -> Result<Vec<RegionShape>> {
    let GeoJson::FeatureCollection(fc) = geojson else {
        bail!("Expected a GeoJSON FeatureCollection");
    };

    let mut regions = Vec::with_capacity(fc.features.len());
    for feature in &fc.features {
        let name = feature
            .properties
            .as_ref()
            .and_then(|p| p.get(name_property))
            .and_then(|v| v.as_str());
        let Some(name) = name else {
            warn!("Skipping feature without '{name_property}' property");
            continue;
        };

        let polygons = feature
            .geometry
            .as_ref()
            .map(polygons_of)
            .unwrap_or_default();
        if polygons.is_empty() {
            warn!("Skipping feature '{name}' without polygon geometry");
            continue;
        }

        regions.push(RegionShape::new(name, polygons));
    }

    if regions.is_empty() {
        bail!("No named polygon features found (property '{name_property}')");
    }
    Ok(regions)
}

fn ring(coords: &[Vec<f64>]) -> Ring {
    coords.iter().map(|c| (c[0], c[1])).collect()
}

/// Polygons of a geometry as rings, exterior first
fn polygons_of(geometry: &Geometry) -> Vec<Vec<Ring>> {
    match &geometry.value {
        Value::Polygon(rings) => vec![rings.iter().map(|r| ring(r)).collect()],
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| rings.iter().map(|r| ring(r)).collect())
            .collect(),
        Value::GeometryCollection(geometries) => geometries.iter().flat_map(polygons_of).collect(),
        _ => Vec::new(),
    }
}

/// Simplified outlines of the 16 federal states for when no boundary file is available
pub fn builtin_regions() -> Vec<RegionShape> {
    fn shape(name: &str, exterior: &[(f64, f64)]) -> RegionShape {
        RegionShape::new(name, vec![vec![exterior.to_vec()]])
    }

    let berlin = [(13.1, 52.65), (13.75, 52.65), (13.75, 52.35), (13.1, 52.35)];

    vec![
        shape(
            "Schleswig-Holstein",
            &[
                (8.6, 54.9), (9.4, 54.85), (10.0, 54.7), (11.1, 54.4), (10.9, 54.0),
                (10.6, 53.6), (10.2, 53.7), (9.75, 53.65), (8.9, 53.9), (8.6, 54.3),
            ],
        ),
        shape("Hamburg", &[(9.75, 53.65), (10.2, 53.7), (10.3, 53.45), (9.9, 53.4), (9.75, 53.55)]),
        shape(
            "Mecklenburg-Vorpommern",
            &[
                (10.6, 53.6), (10.9, 54.0), (11.5, 54.1), (12.3, 54.4), (13.2, 54.6),
                (14.2, 54.1), (14.4, 53.3), (13.3, 53.25), (12.3, 53.2), (11.3, 53.1),
                (10.6, 53.4),
            ],
        ),
        shape("Bremen", &[(8.5, 53.2), (8.95, 53.2), (8.95, 53.0), (8.6, 53.0)]),
        RegionShape::new(
            "Niedersachsen",
            vec![vec![
                vec![
                    (6.7, 53.6), (7.5, 53.7), (8.5, 53.6), (8.9, 53.9), (9.75, 53.55),
                    (9.9, 53.4), (10.3, 53.45), (10.6, 53.4), (11.3, 53.1), (11.5, 52.9),
                    (11.0, 52.6), (10.9, 52.1), (10.6, 51.6), (10.0, 51.4), (9.6, 51.5),
                    (9.3, 51.6), (9.3, 51.8), (8.9, 52.3), (8.3, 52.4), (8.0, 52.0),
                    (7.1, 52.2), (6.7, 52.6), (7.0, 53.2),
                ],
                // Bremen enclave
                vec![(8.5, 53.2), (8.95, 53.2), (8.95, 53.0), (8.6, 53.0)],
            ]],
        ),
        shape("Berlin", &berlin),
        RegionShape::new(
            "Brandenburg",
            vec![vec![
                vec![
                    (11.3, 53.1), (12.3, 53.2), (13.3, 53.25), (14.4, 53.3), (14.15, 52.8),
                    (14.7, 52.1), (14.75, 51.5), (14.0, 51.45), (13.2, 51.4), (12.3, 51.7),
                    (12.2, 52.6), (11.5, 52.9),
                ],
                // Berlin enclave
                berlin.to_vec(),
            ]],
        ),
        shape(
            "Sachsen-Anhalt",
            &[
                (10.6, 51.6), (10.9, 52.1), (11.0, 52.6), (11.5, 52.9), (12.2, 52.6),
                (12.3, 51.7), (12.2, 51.2), (11.4, 51.2), (10.9, 51.4),
            ],
        ),
        shape(
            "Sachsen",
            &[
                (12.3, 51.7), (13.2, 51.4), (14.0, 51.45), (14.75, 51.5), (15.0, 51.0),
                (14.3, 50.9), (13.0, 50.4), (12.3, 50.2), (12.1, 50.5), (12.2, 51.2),
            ],
        ),
        shape(
            "Thüringen",
            &[
                (10.0, 51.4), (10.6, 51.6), (10.9, 51.4), (11.4, 51.2), (12.2, 51.2),
                (12.1, 50.5), (11.9, 50.4), (11.2, 50.3), (10.7, 50.3), (10.0, 50.6),
                (9.9, 51.0),
            ],
        ),
        shape(
            "Hessen",
            &[
                (9.6, 51.5), (10.0, 51.4), (9.9, 51.0), (10.0, 50.6), (9.7, 50.2),
                (9.2, 49.9), (9.1, 49.6), (8.6, 49.4), (8.4, 49.7), (8.0, 50.0),
                (7.8, 50.4), (8.1, 50.8), (8.6, 51.3), (9.3, 51.6),
            ],
        ),
        shape(
            "Nordrhein-Westfalen",
            &[
                (6.0, 51.8), (7.1, 52.2), (8.0, 52.0), (8.3, 52.4), (8.9, 52.3),
                (9.3, 51.8), (9.3, 51.6), (8.6, 51.3), (8.1, 50.8), (7.4, 50.6),
                (6.8, 50.4), (6.1, 50.6), (5.9, 51.0), (6.2, 51.5),
            ],
        ),
        shape(
            "Rheinland-Pfalz",
            &[
                (6.1, 50.15), (6.8, 50.4), (7.4, 50.6), (8.1, 50.8), (7.8, 50.4),
                (8.0, 50.0), (8.4, 49.7), (8.6, 49.4), (8.2, 49.0), (7.6, 49.1),
                (7.4, 49.2), (7.0, 49.6), (6.4, 49.5),
            ],
        ),
        shape("Saarland", &[(6.4, 49.5), (7.0, 49.6), (7.4, 49.2), (7.0, 49.1), (6.6, 49.2)]),
        shape(
            "Baden-Württemberg",
            &[
                (8.2, 49.0), (8.6, 49.4), (9.1, 49.6), (9.5, 49.8), (10.1, 49.5),
                (10.4, 48.9), (10.2, 48.3), (9.9, 47.6), (9.5, 47.55), (8.6, 47.6),
                (7.6, 47.6), (7.55, 48.1), (8.0, 48.8),
            ],
        ),
        shape(
            "Bayern",
            &[
                (9.7, 50.2), (10.0, 50.6), (10.7, 50.3), (11.2, 50.3), (11.9, 50.4),
                (12.1, 50.5), (12.3, 50.2), (12.5, 49.8), (13.0, 49.3), (13.8, 48.8),
                (13.5, 48.6), (13.0, 48.2), (13.0, 47.5), (12.2, 47.6), (11.0, 47.4),
                (10.2, 47.3), (9.9, 47.6), (10.2, 48.3), (10.4, 48.9), (10.1, 49.5),
                (9.5, 49.8), (9.2, 49.9),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAME_1": "Bremen"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[8.5, 53.2], [8.95, 53.2], [8.95, 53.0], [8.5, 53.2]]],
                [[[8.5, 53.5], [8.6, 53.5], [8.6, 53.6], [8.5, 53.5]]]
             ]}},
            {"type": "Feature", "properties": {"NAME_1": "Berlin"},
             "geometry": {"type": "Polygon", "coordinates": [
                [[13.1, 52.65], [13.75, 52.65], [13.75, 52.35], [13.1, 52.65]]
             ]}},
            {"type": "Feature", "properties": {"other": "x"},
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
        ]
    }"#;

    #[test]
    fn test_load_regions_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(COLLECTION.as_bytes()).unwrap();

        let regions = load_regions(file.path(), DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Bremen");
        assert_eq!(regions[0].polygons.len(), 2);
        assert_eq!(regions[1].name, "Berlin");
        assert_eq!(regions[1].polygons[0][0][1], (13.75, 52.65));
    }

    #[test]
    fn test_custom_name_property_without_matches() {
        let geojson: GeoJson = COLLECTION.parse().unwrap();
        assert!(regions_from_geojson(&geojson, "GEN").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_regions(Path::new("/nonexistent/boundaries.json"), DEFAULT_NAME_PROPERTY).is_err());
    }

    #[test]
    fn test_builtin_regions() {
        let regions = builtin_regions();
        assert_eq!(regions.len(), 16);
        for region in &regions {
            assert!(!crate::i18n::region_name(&region.name, crate::model::Language::En).is_empty());
            assert!(region.polygons[0][0].len() >= 4, "{} too coarse", region.name);
        }
    }
}
