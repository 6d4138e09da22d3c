//! Notification payload types carried out of an element instance.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identifier assigned to each recorded notification.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 256;

/// DOM event type used when a [`ChangeEvent`] is dispatched through a document.
pub const CHANGE_EVENT_TYPE: &str = "trellis:change";

/// Direction carried by sort notifications.
///
/// Kept separate from the configuration crate so observers can deserialize
/// notifications without depending on the attribute parsers.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirectionLabel {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

impl SortDirectionLabel {
    /// Lowercase label matching the `aria-sort` vocabulary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// One meaningful state transition inside an enhanced element.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A disclosure item flipped between expanded and collapsed.
    DisclosureChanged {
        /// Identifier of the content node controlled by the item's trigger.
        item_id: String,
        /// State after the flip.
        expanded: bool,
    },
    /// A floating panel was shown or hidden.
    PanelVisibilityChanged {
        /// Identifier of the panel element.
        panel_id: String,
        /// State after the change.
        visible: bool,
    },
    /// A table was re-sorted.
    SortChanged {
        /// Column key that is now active.
        column: String,
        /// Direction applied to the column.
        direction: SortDirectionLabel,
    },
}

impl ChangeEvent {
    /// Machine-friendly discriminator for observers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DisclosureChanged { .. } => "disclosure_changed",
            Self::PanelVisibilityChanged { .. } => "panel_visibility_changed",
            Self::SortChanged { .. } => "sort_changed",
        }
    }

    /// Identifier of the item, panel or column the notification is about.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::DisclosureChanged { item_id, .. } => item_id,
            Self::PanelVisibilityChanged { panel_id, .. } => panel_id,
            Self::SortChanged { column, .. } => column,
        }
    }
}

/// Metadata wrapper around notifications. Each envelope tracks the sequence
/// id, the recording timestamp and the element instance that emitted it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct EventEnvelope {
    /// Sequential identifier assigned by the journal.
    pub id: EventId,
    /// Time the notification was recorded.
    pub timestamp: DateTime<Utc>,
    /// Element instance that emitted the notification.
    pub host: Uuid,
    /// Notification payload.
    pub event: ChangeEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_event_serializes_with_type_tag() {
        let event = ChangeEvent::SortChanged {
            column: "name".into(),
            direction: SortDirectionLabel::Descending,
        };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["type"], "sort_changed");
        assert_eq!(value["direction"], "descending");

        let back: ChangeEvent = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn subject_points_at_identifier() {
        let event = ChangeEvent::PanelVisibilityChanged {
            panel_id: "tip-1".into(),
            visible: true,
        };
        assert_eq!(event.subject(), "tip-1");
        assert_eq!(event.kind(), "panel_visibility_changed");
    }
}
