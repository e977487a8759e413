//! Conversion of GeoJSON documents into pipeline elements.

use geojson::feature::Id;
use geojson::{Feature, GeoJson, Value};

use crate::element::{GeoElement, GeoPoint, Geom};
use crate::error::InkmapError;

/// Parses a GeoJSON document into a list of [`GeoElement`]s.
///
/// Feature properties become string tags (scalar values are stringified,
/// nested values are skipped). Multi-geometries are split into one element
/// per part, all sharing the source feature's id.
pub fn elements_from_geojson(input: &str) -> Result<Vec<GeoElement>, InkmapError> {
    let geojson: GeoJson = input
        .parse()
        .map_err(|err: geojson::Error| InkmapError::Generic(format!("invalid GeoJSON: {err}")))?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(InkmapError::Generic(
                "expected a GeoJSON feature or feature collection".to_string(),
            ))
        }
    };

    let mut elements = Vec::new();
    for (index, feature) in features.into_iter().enumerate() {
        let id = feature_id(&feature).unwrap_or(index as u64);
        let tags = feature_tags(&feature);

        let Some(geometry) = feature.geometry else {
            log::debug!("skipping feature {id} without geometry");
            continue;
        };
        push_geometry(&mut elements, id, &tags, geometry.value)?;
    }

    Ok(elements)
}

fn feature_id(feature: &Feature) -> Option<u64> {
    match feature.id.as_ref()? {
        Id::Number(number) => number.as_u64(),
        Id::String(string) => string.parse().ok(),
    }
}

fn feature_tags(feature: &Feature) -> Vec<(String, String)> {
    let Some(properties) = &feature.properties else {
        return Vec::new();
    };

    properties
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                geojson::JsonValue::String(string) => string.clone(),
                geojson::JsonValue::Number(number) => number.to_string(),
                geojson::JsonValue::Bool(boolean) => boolean.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}

fn push_geometry(
    elements: &mut Vec<GeoElement>,
    id: u64,
    tags: &[(String, String)],
    value: Value,
) -> Result<(), InkmapError> {
    fn push(elements: &mut Vec<GeoElement>, id: u64, tags: &[(String, String)], geom: Geom) {
        elements.push(GeoElement::new(id, geom, tags.to_vec()));
    }

    match value {
        Value::Point(position) => push(elements, id, tags, Geom::Point(point(&position)?)),
        Value::MultiPoint(positions) => {
            for position in positions {
                push(elements, id, tags, Geom::Point(point(&position)?));
            }
        }
        Value::LineString(positions) => push(elements, id, tags, Geom::Line(points(&positions)?)),
        Value::MultiLineString(lines) => {
            for line in lines {
                push(elements, id, tags, Geom::Line(points(&line)?));
            }
        }
        Value::Polygon(rings) => {
            if let Some(outer) = rings.first() {
                push(elements, id, tags, Geom::Polygon(points(outer)?));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(outer) = rings.first() {
                    push(elements, id, tags, Geom::Polygon(points(outer)?));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                push_geometry(elements, id, tags, geometry.value)?;
            }
        }
    }
    Ok(())
}

fn point(position: &[f64]) -> Result<GeoPoint, InkmapError> {
    if position.len() < 2 {
        return Err(InkmapError::Generic(
            "GeoJSON position with fewer than two coordinates".to_string(),
        ));
    }
    // GeoJSON positions are [longitude, latitude].
    Ok(GeoPoint::latlon(position[1], position[0]))
}

fn points(positions: &[Vec<f64>]) -> Result<Vec<GeoPoint>, InkmapError> {
    positions.iter().map(|p| point(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;

    #[test]
    fn parses_feature_collection() {
        let input = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 42,
                    "properties": { "highway": "residential", "lanes": 2 },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[2.3522, 48.8566], [2.3530, 48.8570]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "tourism": "museum" },
                    "geometry": { "type": "Point", "coordinates": [2.3376, 48.8606] }
                }
            ]
        }"#;

        let elements = elements_from_geojson(input).unwrap();
        assert_eq!(elements.len(), 2);

        assert_eq!(elements[0].id(), 42);
        assert_eq!(elements[0].tag("highway"), Some("residential"));
        assert_eq!(elements[0].tag("lanes"), Some("2"));
        assert_eq!(
            elements[0].geometry(),
            &Geom::Line(vec![latlon!(48.8566, 2.3522), latlon!(48.8570, 2.3530)])
        );

        assert_eq!(elements[1].id(), 1);
        assert_eq!(
            elements[1].geometry(),
            &Geom::Point(latlon!(48.8606, 2.3376))
        );
    }

    #[test]
    fn splits_multi_geometries() {
        let input = r#"{
            "type": "Feature",
            "properties": { "natural": "water" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                    [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]]
                ]
            }
        }"#;

        let elements = elements_from_geojson(input).unwrap();
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0].geometry(), Geom::Polygon(_)));
        assert_eq!(elements[1].tag("natural"), Some("water"));
    }

    #[test]
    fn rejects_bare_geometry() {
        let input = r#"{ "type": "Point", "coordinates": [2.0, 48.0] }"#;
        assert!(elements_from_geojson(input).is_err());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(elements_from_geojson("{ not geojson").is_err());
    }
}
