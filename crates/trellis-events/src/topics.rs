//! Notification kind identifiers used by observers.

/// Machine-friendly discriminator for a notification.
#[must_use]
pub const fn event_kind(event: &crate::payloads::ChangeEvent) -> &'static str {
    event.kind()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::ChangeEvent;

    #[test]
    fn event_kind_matches_payload() {
        assert_eq!(
            event_kind(&ChangeEvent::DisclosureChanged {
                item_id: "a".into(),
                expanded: true
            }),
            "disclosure_changed"
        );
        assert_eq!(
            event_kind(&ChangeEvent::PanelVisibilityChanged {
                panel_id: "p".into(),
                visible: false
            }),
            "panel_visibility_changed"
        );
    }
}
