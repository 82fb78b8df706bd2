//! Job metadata profiles.

use serde::{Deserialize, Serialize};

/// Configuration passed through to the service when creating a job.
///
/// `name` selects which remote model runs; `format` is the expected output
/// container. Any additional keys are forwarded unmodified. Locally the
/// metadata is only used to derive output filenames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetadata {
    /// Remote model name (e.g. "music_detection")
    pub name: String,
    /// Expected output container (e.g. "json", "wav")
    pub format: String,
    /// Extra service-specific keys, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobMetadata {
    /// Create a metadata profile for a named model and output format.
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Profile for the music detection model (JSON region list output).
    pub fn music_detection() -> Self {
        Self::new("music_detection", "json")
    }

    /// Profile for the music removal model (audio output).
    pub fn music_removal() -> Self {
        Self::new("music_removal", "wav")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let detect = JobMetadata::music_detection();
        assert_eq!(detect.name, "music_detection");
        assert_eq!(detect.format, "json");

        let remove = JobMetadata::music_removal();
        assert_eq!(remove.name, "music_removal");
        assert_eq!(remove.format, "wav");
    }

    #[test]
    fn test_extra_keys_round_trip() {
        let json = r#"{"name": "music_removal", "format": "wav", "variant": "v2"}"#;
        let meta: JobMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.extra.get("variant").unwrap(), "v2");

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back.get("variant").unwrap(), "v2");
    }
}
