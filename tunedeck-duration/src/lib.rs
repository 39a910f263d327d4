//! tunedeck-duration library - total-duration endpoint dispatch.
//!
//! Reads the requesting user's stored collection and folds it through the
//! duration aggregator. The store is read-only from this side; a missing
//! file is a normal outcome (the note variant), not an error.

use std::path::PathBuf;

use tunedeck_common::duration::{summarize_records, DurationSummary};
use tunedeck_common::endpoint::Dispatcher;
use tunedeck_common::envelope::{DecodedRequest, Request, Response};
use tunedeck_common::liked;

/// Total-duration service state: the data root holding per-user collections.
pub struct TotalDurationService {
    root: PathBuf,
}

impl TotalDurationService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Compute the duration summary for one user's stored collection.
    pub fn compute_for_user(&self, username: &str) -> Response {
        let path = liked::liked_songs_path(&self.root, username);
        if !path.exists() {
            let mut summary = DurationSummary::empty();
            summary.note = Some(format!("No liked songs file for user '{username}'."));
            return Response::Duration(summary);
        }
        match liked::read_raw(&path) {
            Ok(records) => Response::Duration(summarize_records(&records)),
            Err(e) => Response::error(format!("Failed to read liked songs: {e}")),
        }
    }
}

impl Dispatcher for TotalDurationService {
    fn name(&self) -> &'static str {
        "total-duration"
    }

    async fn dispatch(&self, request: DecodedRequest) -> Response {
        match request {
            DecodedRequest::Known(Request::GetTotalDuration { username }) => {
                let username = username.trim();
                if username.is_empty() {
                    return Response::error("Missing 'username'");
                }
                self.compute_for_user(username)
            }
            _ => Response::invalid_request_type(),
        }
    }
}
