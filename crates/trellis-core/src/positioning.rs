//! Floating panel positioning.
//!
//! Offsets are computed from the trigger and panel bounding boxes at the
//! moment the panel is shown, relative to the panel's parent box. The
//! preferred side is authoritative: there is no flip when the panel would
//! overflow the viewport. Hiding unsets every inline property a show wrote.

use trellis_config::{Position, Side};
use trellis_dom::{Document, NodeId, Rect};
use trellis_events::ChangeEvent;

/// Class of the wrapper around trigger and body.
pub const WRAPPER_CLASS: &str = "usa-tooltip";
/// Class added to the trigger.
pub const TRIGGER_CLASS: &str = "usa-tooltip__trigger";
/// Class of the floating body.
pub const BODY_CLASS: &str = "usa-tooltip__body";
/// Set while the body is positioned.
pub const SET_CLASS: &str = "is-set";
/// Set while the body is visible.
pub const VISIBLE_CLASS: &str = "is-visible";

const OFFSET_PROPERTIES: [&str; 4] = ["left", "top", "margin-left", "margin-top"];
const SIDES: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

/// Inline offsets for one show.
///
/// `left`/`top` place the panel's anchor point; the margin centres the panel
/// on the trigger along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Side the panel sits on.
    pub side: Side,
    /// Horizontal offset from the parent box, in px.
    pub left: f64,
    /// Vertical offset from the parent box, in px.
    pub top: f64,
    /// Horizontal centring margin (top and bottom sides).
    pub margin_left: f64,
    /// Vertical centring margin (left and right sides).
    pub margin_top: f64,
}

impl Placement {
    /// Panel box the placement produces, relative to the parent box.
    #[must_use]
    pub fn panel_box(&self, panel: Rect) -> Rect {
        let x0 = self.left + self.margin_left;
        let y0 = self.top + self.margin_top;
        Rect::new(x0, y0, x0 + panel.width(), y0 + panel.height())
    }
}

/// Body class for a side.
#[must_use]
pub fn side_class(side: Side) -> String {
    format!("{BODY_CLASS}--{}", side.as_str())
}

/// Offsets placing `panel` next to `trigger` on `side`, `gap` px away.
/// `origin` is the box offsets are measured from.
#[must_use]
pub fn compute(trigger: Rect, panel: Rect, origin: Rect, side: Side, gap: f64) -> Placement {
    let trigger_x = trigger.x0 - origin.x0;
    let trigger_y = trigger.y0 - origin.y0;
    let mut placement = Placement {
        side,
        left: 0.0,
        top: 0.0,
        margin_left: 0.0,
        margin_top: 0.0,
    };
    match side {
        Side::Top | Side::Bottom => {
            placement.left = trigger_x + trigger.width() / 2.0;
            placement.margin_left = -(panel.width() / 2.0);
            placement.top = if side == Side::Top {
                trigger_y - panel.height() - gap
            } else {
                trigger_y + trigger.height() + gap
            };
        }
        Side::Left | Side::Right => {
            placement.top = trigger_y + trigger.height() / 2.0;
            placement.margin_top = -(panel.height() / 2.0);
            placement.left = if side == Side::Left {
                trigger_x - panel.width() - gap
            } else {
                trigger_x + trigger.width() + gap
            };
        }
    }
    placement
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Unset every inline offset written by [`position`].
pub fn clear_offsets(doc: &mut Document, panel: NodeId) {
    for property in OFFSET_PROPERTIES {
        doc.remove_style(panel, property);
    }
}

/// Measure and apply a placement.
///
/// A missing or invisible trigger, or an invisible panel, leaves the panel
/// unpositioned and returns `None`.
pub fn position(
    doc: &mut Document,
    trigger: Option<NodeId>,
    panel: NodeId,
    preferred: &Position,
    gap: f64,
) -> Option<Placement> {
    let side = preferred.side();
    for other in SIDES {
        doc.remove_class(panel, &side_class(other));
    }
    clear_offsets(doc, panel);

    let trigger = trigger.filter(|trigger| doc.is_visible(*trigger))?;
    if !doc.is_visible(panel) {
        return None;
    }
    let origin = doc
        .parent_element(panel)
        .map_or(Rect::ZERO, |parent| doc.bounding_rect(parent));
    let placement = compute(
        doc.bounding_rect(trigger),
        doc.bounding_rect(panel),
        origin,
        side,
        gap,
    );

    doc.add_class(panel, &side_class(side));
    doc.set_style(panel, "left", &px(placement.left));
    doc.set_style(panel, "top", &px(placement.top));
    match side {
        Side::Top | Side::Bottom => doc.set_style(panel, "margin-left", &px(placement.margin_left)),
        Side::Left | Side::Right => doc.set_style(panel, "margin-top", &px(placement.margin_top)),
    }
    let viewport = doc.viewport();
    let landed = placement.panel_box(doc.bounding_rect(panel)) + origin.origin().to_vec2();
    if landed.intersect(viewport).area() < landed.area() {
        tracing::trace!(side = side.as_str(), "panel overflows the viewport");
    }
    Some(placement)
}

/// Whether the panel is shown.
#[must_use]
pub fn is_shown(doc: &Document, panel: NodeId) -> bool {
    doc.has_class(panel, VISIBLE_CLASS)
}

/// Show the panel, recomputing its placement from the current boxes.
/// Returns a change only when the panel was hidden before.
pub fn show(
    doc: &mut Document,
    trigger: Option<NodeId>,
    panel: NodeId,
    preferred: &Position,
    gap: f64,
) -> Option<ChangeEvent> {
    let _span = tracing::trace_span!("show", position = preferred.as_str()).entered();
    let was_shown = is_shown(doc, panel);
    doc.add_class(panel, SET_CLASS);
    position(doc, trigger, panel, preferred, gap);
    doc.add_class(panel, VISIBLE_CLASS);
    doc.set_attribute(panel, "aria-hidden", "false");
    (!was_shown).then(|| visibility_change(doc, panel, true))
}

/// Hide the panel and unset its offsets. Returns a change only when the
/// panel was shown before.
pub fn hide(doc: &mut Document, panel: NodeId) -> Option<ChangeEvent> {
    let was_shown = is_shown(doc, panel);
    doc.remove_class(panel, VISIBLE_CLASS);
    doc.remove_class(panel, SET_CLASS);
    for side in SIDES {
        doc.remove_class(panel, &side_class(side));
    }
    clear_offsets(doc, panel);
    doc.set_attribute(panel, "aria-hidden", "true");
    was_shown.then(|| visibility_change(doc, panel, false))
}

fn visibility_change(doc: &Document, panel: NodeId, visible: bool) -> ChangeEvent {
    ChangeEvent::PanelVisibilityChanged {
        panel_id: doc.id(panel).unwrap_or_default().to_string(),
        visible,
    }
}
