use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::EntrantId;

/// An uploaded image competing in the bracket.
///
/// Entrants are immutable once registered. Matches refer to them by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    /// Stored name: `<upload millis>-<id>-<original name>`.
    pub filename: String,
    /// Path the image is served under, e.g. `/uploads/<filename>`.
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Entrant {
    /// Prefix under which uploaded files are exposed.
    pub const UPLOAD_PREFIX: &'static str = "/uploads";

    /// Creates a new entrant for an upload named `original`, stamped with the
    /// current time. Uploading the same name twice yields distinct paths.
    pub fn new(original: &str) -> Self {
        let id = EntrantId::new();
        let uploaded_at = Utc::now();
        let filename = format!(
            "{}-{}-{}",
            uploaded_at.timestamp_millis(),
            id.as_uuid().simple(),
            original
        );
        let path = format!("{}/{}", Self::UPLOAD_PREFIX, filename);
        Self {
            id,
            filename,
            path,
            uploaded_at,
        }
    }

    /// The name the image was uploaded under.
    #[must_use]
    pub fn original_name(&self) -> &str {
        self.filename
            .splitn(3, '-')
            .nth(2)
            .unwrap_or(self.filename.as_str())
    }
}
