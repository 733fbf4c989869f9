/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the storage layer, the coordinator, and the UI layer.

use serde::{Deserialize, Serialize};

/// Tunable parameters of a style transformation
///
/// These values are sent to the external transformation service alongside
/// the source photo. They are serialized to JSON both for the service call
/// and for history persistence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StyleParams {
    /// Text prompt describing the target look
    pub prompt: String,

    /// Transformation strength (0.0 to 1.0)
    /// - 0.0 = barely touches the photo
    /// - 1.0 = fully committed to the style
    pub strength: f32,

    /// Prompt guidance scale (1.0 to 20.0)
    /// - Low values let the photo dominate
    /// - High values let the prompt dominate
    pub guidance: f32,

    /// Keep the main subject recognizable while restyling the scene
    pub preserve_subject: bool,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            strength: 0.75,
            guidance: 7.5,
            preserve_subject: true,
        }
    }
}

impl StyleParams {
    /// Convert to JSON string for the service request body
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string (from storage)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// An immutable description of a style to apply to a photo
///
/// Supplied by the static catalog; treated as read-only reference data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transformation {
    /// Catalog-wide unique identifier (e.g. "film-noir")
    pub id: String,
    /// Display name (e.g. "Film Noir")
    pub name: String,
    /// Key of the catalog category this style belongs to
    pub category: String,
    /// Service parameters for this style
    pub parameters: StyleParams,
}

/// A persisted record pairing a completed transformation with its result
///
/// Created only when a transformation completes successfully.
/// Immutable after creation except for deletion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryItem {
    /// Unique id, generated at creation (UUID v4)
    pub id: String,
    /// The style that produced this result
    pub transformation: Transformation,
    /// URI of the result image returned by the service
    pub result_image: String,
    /// Creation time as unix seconds
    pub created_at: i64,
}

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

/// Identifier of a live toast, unique for the queue's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(pub u64);

/// A transient, auto-expiring user notification
///
/// Lives only in memory; destroyed after a fixed display duration
/// or by explicit dismissal, whichever comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    /// Creation time as unix seconds
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_params_roundtrip() {
        let params = StyleParams {
            prompt: "ink wash painting".to_string(),
            strength: 0.6,
            guidance: 9.0,
            preserve_subject: false,
        };

        let json = params.to_json().unwrap();
        let restored = StyleParams::from_json(&json).unwrap();

        assert_eq!(params, restored);
    }

    #[test]
    fn test_history_item_roundtrip() {
        let item = HistoryItem {
            id: "a-unique-id".to_string(),
            transformation: Transformation {
                id: "film-noir".to_string(),
                name: "Film Noir".to_string(),
                category: "cinematic".to_string(),
                parameters: StyleParams::default(),
            },
            result_image: "https://cdn.example/results/1.jpg".to_string(),
            created_at: 1_700_000_000,
        };

        let json = serde_json::to_string(&item).unwrap();
        let restored: HistoryItem = serde_json::from_str(&json).unwrap();

        assert_eq!(item, restored);
    }
}
