//! Request/response envelopes for the service wire protocol.
//!
//! One envelope per request/reply cycle; nothing is retained across calls.
//! The request `type` string is the sole dispatch key. Decoding never fails
//! on an unrecognized or absent `type`: such requests decode to
//! [`DecodedRequest::Unknown`] so the endpoint can answer with the standard
//! error envelope instead of dropping the connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::duration::DurationSummary;
use crate::song::SongRecord;

/// Error message for an absent or unrecognized request `type`.
pub const INVALID_REQUEST_TYPE: &str = "Invalid request type";

/// A typed request envelope, one variant per supported operation.
///
/// `auth_key` is carried opaquely on recommendation requests and ignored by
/// the services. `exclude_titles` lists already-liked titles the
/// recommendation service filters out before applying the result cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    RecommendByArtist {
        #[serde(default)]
        artist: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_titles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_key: Option<String>,
    },
    RecommendByGenre {
        #[serde(default)]
        genre: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_titles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_key: Option<String>,
    },
    RecommendPopular {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_titles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_key: Option<String>,
    },
    RandomSong,
    GetSongByYear {
        /// Kept raw; coercion failures are a dispatch error, not a decode error
        #[serde(default)]
        year: Value,
    },
    GetTotalDuration {
        #[serde(default)]
        username: String,
    },
}

/// Outcome of decoding one request envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRequest {
    Known(Request),
    /// `type` absent, unrecognized, or fields invalid for the named type
    Unknown { request_type: Option<String> },
}

/// Decode one request line.
///
/// Malformed JSON is the only error; a well-formed object always decodes,
/// falling back to [`DecodedRequest::Unknown`] when it is not a recognized
/// request shape. Unknown extra fields are ignored.
pub fn decode_request(line: &str) -> crate::Result<DecodedRequest> {
    let value: Value = serde_json::from_str(line)?;
    Ok(classify_request(value))
}

fn classify_request(value: Value) -> DecodedRequest {
    let request_type = value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned);
    match serde_json::from_value::<Request>(value) {
        Ok(request) => DecodedRequest::Known(request),
        Err(_) => DecodedRequest::Unknown { request_type },
    }
}

/// Coerce a raw `year` wire value to an integer.
///
/// Tolerates integer-valued floats and digit strings; anything else is a
/// dispatch error at the endpoint.
pub fn coerce_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// A response envelope: exactly one success payload shape, or `{error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Error { error: String },
    Recommendations { recommendations: Vec<SongRecord> },
    Song { song: SongRecord },
    Songs { songs: Vec<SongRecord> },
    Duration(DurationSummary),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }

    /// The standard error envelope for an absent/unrecognized request type.
    pub fn invalid_request_type() -> Self {
        Self::error(INVALID_REQUEST_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_type_is_the_discriminator() {
        let decoded = decode_request(r#"{"type": "random_song"}"#).unwrap();
        assert_eq!(decoded, DecodedRequest::Known(Request::RandomSong));

        let decoded =
            decode_request(r#"{"type": "recommend_by_artist", "artist": "Daft Punk"}"#).unwrap();
        let DecodedRequest::Known(Request::RecommendByArtist { artist, .. }) = decoded else {
            panic!("expected recommend_by_artist");
        };
        assert_eq!(artist, "Daft Punk");
    }

    #[test]
    fn unknown_type_still_decodes() {
        let decoded = decode_request(r#"{"type": "flux_capacitor", "year": 1985}"#).unwrap();
        assert_eq!(
            decoded,
            DecodedRequest::Unknown {
                request_type: Some("flux_capacitor".into())
            }
        );

        let decoded = decode_request(r#"{"artist": "nobody"}"#).unwrap();
        assert_eq!(decoded, DecodedRequest::Unknown { request_type: None });
    }

    #[test]
    fn malformed_json_is_a_codec_error() {
        assert!(decode_request("not json at all").is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let decoded = decode_request(
            r#"{"type": "get_total_duration", "username": "ana", "client_version": 7}"#,
        )
        .unwrap();
        assert_eq!(
            decoded,
            DecodedRequest::Known(Request::GetTotalDuration {
                username: "ana".into()
            })
        );
    }

    #[test]
    fn auth_key_passes_through_opaquely() {
        let request = Request::RecommendPopular {
            exclude_titles: vec![],
            auth_key: Some("sekrit".into()),
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["type"], json!("recommend_popular"));
        assert_eq!(wire["auth_key"], json!("sekrit"));

        let back: Request = serde_json::from_value(wire).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn year_coercion() {
        assert_eq!(coerce_year(&json!(2010)), Some(2010));
        assert_eq!(coerce_year(&json!(2010.0)), Some(2010));
        assert_eq!(coerce_year(&json!("2010")), Some(2010));
        assert_eq!(coerce_year(&json!(" 2010 ")), Some(2010));
        assert_eq!(coerce_year(&json!("twenty ten")), None);
        assert_eq!(coerce_year(&json!(null)), None);
        assert_eq!(coerce_year(&json!([2010])), None);
    }

    #[test]
    fn response_shapes_decode_unambiguously() {
        let error: Response = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(error, Response::error("boom"));

        let songs: Response = serde_json::from_value(json!({"songs": []})).unwrap();
        assert_eq!(songs, Response::Songs { songs: vec![] });

        let song: Response = serde_json::from_value(json!({
            "song": {"title": "T", "artist": "A", "genre": "G",
                     "year": null, "duration": null, "popularity": null}
        }))
        .unwrap();
        assert!(matches!(song, Response::Song { .. }));

        let duration: Response = serde_json::from_value(json!({
            "total_seconds": 210, "readable": "3 mins 30 secs",
            "count_songs": 1, "skipped": 0
        }))
        .unwrap();
        let Response::Duration(summary) = duration else {
            panic!("expected duration summary");
        };
        assert_eq!(summary.total_seconds, 210);
        assert_eq!(summary.note, None);
    }
}
