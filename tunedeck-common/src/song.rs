//! Song record model shared by the dataset, the wire, and the liked-song store.

use serde::{Deserialize, Serialize};

/// A duration value as it appears on the wire or on disk.
///
/// Durations come from independently evolved producers (the CSV dataset, the
/// services, manual entry) and are untyped at the wire level: integer
/// milliseconds, integer seconds, `"3:30"`, `"242667 ms"`, or `"unknown"`.
/// Consumers normalize through [`crate::duration::parse_raw_duration`];
/// producers never do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Int(i64),
    Float(f64),
    Text(String),
}

/// One song, as exchanged between services and stored in liked-song files.
///
/// Immutable once constructed. `year`, `duration` and `popularity` are
/// optional; a missing value encodes as JSON `null`, never as a sentinel
/// string. Unknown extra fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub genre: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub duration: Option<RawDuration>,
    #[serde(default)]
    pub popularity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_optionals_encode_as_null() {
        let song = SongRecord {
            title: "Silence".into(),
            artist: "Nobody".into(),
            genre: "Ambient".into(),
            year: None,
            duration: None,
            popularity: None,
        };
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Silence",
                "artist": "Nobody",
                "genre": "Ambient",
                "year": null,
                "duration": null,
                "popularity": null,
            })
        );
    }

    #[test]
    fn extra_fields_are_ignored_on_decode() {
        let song: SongRecord = serde_json::from_value(json!({
            "title": "Hello",
            "artist": "A",
            "genre": "Pop",
            "year": 2020,
            "duration": "3:30",
            "popularity": 71,
            "date_added": "2020-01-01",
            "album": "A1",
        }))
        .unwrap();
        assert_eq!(song.duration, Some(RawDuration::Text("3:30".into())));
        assert_eq!(song.year, Some(2020));
    }

    #[test]
    fn duration_keeps_its_wire_shape() {
        let ms: RawDuration = serde_json::from_value(json!(242667)).unwrap();
        assert_eq!(ms, RawDuration::Int(242667));
        let text: RawDuration = serde_json::from_value(json!("242667 ms")).unwrap();
        assert_eq!(text, RawDuration::Text("242667 ms".into()));
    }
}
