//! Wire types for the catalog's date-list and per-date manifest responses.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// One entry of the date-list endpoints. Equality is string equality on the
/// `YYYY-MM-DD` value.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObservationDate {
    pub date: String,
}

impl std::fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Quaternions {
    pub q0: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// The five geometry blocks attached to every image record. The upstream API
/// sends two copies per record; both map onto this one struct.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Geometry {
    pub centroid_coordinates: Coordinates,
    pub dscovr_j2000_position: Position,
    pub lunar_j2000_position: Position,
    pub sun_j2000_position: Position,
    pub attitude_quaternions: Quaternions,
}

/// One published image. `geometry` is flattened so the serialized form keeps
/// the upstream quirk of repeating every geometry block at the top level and
/// again under `coords`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ImageRecord {
    pub identifier: String,
    pub caption: String,
    pub image: String,
    pub version: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub date: String,
    pub coords: Geometry,
}

pub fn parse_date_list(body: &str) -> Result<Vec<ObservationDate>, SyncError> {
    let dates: Vec<ObservationDate> = serde_json::from_str(body)?;
    Ok(dates)
}

pub fn parse_manifest(body: &str) -> Result<Vec<ImageRecord>, SyncError> {
    let records: Vec<ImageRecord> = serde_json::from_str(body)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"[
      {
        "identifier": "20151031220539",
        "caption": "This image was taken by NASA's EPIC camera onboard the NOAA DSCOVR spacecraft",
        "image": "epic_1b_20151031221308",
        "version": "02",
        "centroid_coordinates": { "lat": -16.960352, "lon": 159.908142 },
        "dscovr_j2000_position": { "x": -1283061.5, "y": -669893.75, "z": -130240.863281 },
        "lunar_j2000_position": { "x": 33716.0703, "y": -364842.6875, "z": -152637.71875 },
        "sun_j2000_position": { "x": 118585640.0, "y": -82904368.0, "z": -35940800.0 },
        "attitude_quaternions": { "q0": -0.27615, "q1": -0.195928, "q2": 0.720624, "q3": 0.609173 },
        "date": "2015-10-31 22:08:19",
        "coords": {
          "centroid_coordinates": { "lat": -16.960352, "lon": 159.908142 },
          "dscovr_j2000_position": { "x": -1283061.5, "y": -669893.75, "z": -130240.863281 },
          "lunar_j2000_position": { "x": 33716.0703, "y": -364842.6875, "z": -152637.71875 },
          "sun_j2000_position": { "x": 118585640.0, "y": -82904368.0, "z": -35940800.0 },
          "attitude_quaternions": { "q0": -0.27615, "q1": -0.195928, "q2": 0.720624, "q3": 0.609173 }
        }
      }
    ]"#;

    #[test]
    fn test_parse_date_list_preserves_order() {
        let body = r#"[{"date":"2018-09-21"},{"date":"2018-09-20"},{"date":"2018-09-19"}]"#;
        let dates = parse_date_list(body).unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].date, "2018-09-21");
        assert_eq!(dates[1].date, "2018-09-20");
        assert_eq!(dates[2].date, "2018-09-19");
    }

    #[test]
    fn test_parse_date_list_rejects_malformed_body() {
        let err = parse_date_list("<html>not json</html>").unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_parse_manifest_fields() {
        let records = parse_manifest(SAMPLE_MANIFEST).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.identifier, "20151031220539");
        assert_eq!(record.image, "epic_1b_20151031221308");
        assert_eq!(record.version, "02");
        assert_eq!(record.date, "2015-10-31 22:08:19");
        assert_eq!(record.geometry.centroid_coordinates.lat, -16.960352);
        assert_eq!(record.geometry.centroid_coordinates.lon, 159.908142);
        assert_eq!(record.geometry.dscovr_j2000_position.z, -130240.863281);
        assert_eq!(record.geometry.attitude_quaternions.q0, -0.27615);
        // Upstream sends identical copies at the top level and under "coords".
        assert_eq!(record.geometry, record.coords);
    }

    #[test]
    fn test_manifest_round_trip_keeps_both_geometry_copies() {
        let records = parse_manifest(SAMPLE_MANIFEST).unwrap();
        let reserialized = serde_json::to_value(&records).unwrap();
        let original: serde_json::Value = serde_json::from_str(SAMPLE_MANIFEST).unwrap();
        assert_eq!(reserialized, original);
    }
}
