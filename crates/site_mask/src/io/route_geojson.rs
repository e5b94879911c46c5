use geojson::{Feature, GeoJson, Geometry, Value};
use crate::{
    error::{MissionError, Result},
    types::{GeoBoundingBox, GeoPath, GeoPoint},
};

impl GeoPath {
    /// Export as a GeoJSON LineString feature. The bounding box, when given,
    /// becomes the feature's `bbox` member.
    pub fn to_geojson(&self, bbox: Option<&GeoBoundingBox>) -> Feature {
        let coordinates = self.path.iter().map(|p| vec![p.x, p.y]).collect();
        let geometry = Geometry::new(Value::LineString(coordinates));

        let mut properties = serde_json::Map::new();
        properties.insert("points".to_string(), serde_json::Value::from(self.len()));
        properties.insert(
            "length".to_string(),
            serde_json::Number::from_f64(self.length())
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        );

        let bbox = bbox.map(|b| {
            let rect = b.to_rect();
            vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]
        });

        Feature {
            bbox,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self, bbox: Option<&GeoBoundingBox>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson(bbox))?)
    }

    /// Read the first LineString of a GeoJSON feature, feature collection
    /// or bare geometry.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self> {
        let geojson: GeoJson = geojson_str.parse()?;

        let geometries: Vec<Geometry> = match geojson {
            GeoJson::Geometry(geometry) => vec![geometry],
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .collect(),
        };

        geometries
            .into_iter()
            .find_map(|geometry| match geometry.value {
                Value::LineString(coords) => Some(coords),
                _ => None,
            })
            .map(|coords| {
                GeoPath::new(
                    coords
                        .iter()
                        .filter(|c| c.len() >= 2)
                        .map(|c| GeoPoint::new(c[0], c[1]))
                        .collect(),
                )
            })
            .ok_or_else(|| MissionError::InvalidCoordinate("no LineString in GeoJSON".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeoPath {
        GeoPath::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 3.0), GeoPoint::new(4.0, 3.0)])
    }

    #[test]
    fn test_feature_shape() {
        let bbox = GeoBoundingBox::new(0.0, 10.0, 10.0, 0.0);
        let feature = sample().to_geojson(Some(&bbox));

        assert_eq!(feature.bbox, Some(vec![0.0, 0.0, 10.0, 10.0]));
        let properties = feature.properties.unwrap();
        assert_eq!(properties["points"], serde_json::json!(3));
        assert_eq!(properties["length"], serde_json::json!(7.0));
        match feature.geometry.unwrap().value {
            Value::LineString(coords) => assert_eq!(coords[2], vec![4.0, 3.0]),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_read_back() {
        let text = sample().to_geojson_string(None).unwrap();
        assert_eq!(GeoPath::from_geojson_str(&text).unwrap(), sample());
    }

    #[test]
    fn test_read_without_linestring() {
        let text = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(
            GeoPath::from_geojson_str(text),
            Err(MissionError::InvalidCoordinate(_))
        ));
    }
}
