//! The shared message bubble.
//!
//! One bubble serves the whole pod row: custom icon tooltips, the
//! multi-profile policy notice and the supervised user warning all take
//! turns in it. Whoever shows content becomes the anchor; only the anchor
//! can hide it again through [`Bubble::hide_for`].

/// Element the bubble is attached to. Pods are identified by username.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BubbleAnchor {
    /// A pod's custom icon.
    CustomIcon(String),
    /// The pod tile itself.
    Pod(String),
    /// A pod's action box (remove warnings).
    ActionBox(String),
}

/// Which side of the anchor the bubble sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attachment {
    #[default]
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Shown {
    anchor: BubbleAnchor,
    content: String,
    attachment: Attachment,
}

/// Headless bubble state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bubble {
    shown: Option<Shown>,
}

impl Bubble {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `content` next to `anchor`, replacing whatever was shown.
    pub fn show_for(&mut self, anchor: BubbleAnchor, content: &str, attachment: Attachment) {
        self.shown = Some(Shown {
            anchor,
            content: content.to_string(),
            attachment,
        });
    }

    /// Hide the bubble only if it is attached to `anchor`.
    pub fn hide_for(&mut self, anchor: &BubbleAnchor) {
        if self.is_shown_for(anchor) {
            self.shown = None;
        }
    }

    /// Hide unconditionally.
    pub fn hide(&mut self) {
        self.shown = None;
    }

    pub fn is_hidden(&self) -> bool {
        self.shown.is_none()
    }

    pub fn is_shown_for(&self, anchor: &BubbleAnchor) -> bool {
        self.shown.as_ref().is_some_and(|s| &s.anchor == anchor)
    }

    pub fn anchor(&self) -> Option<&BubbleAnchor> {
        self.shown.as_ref().map(|s| &s.anchor)
    }

    pub fn content(&self) -> Option<&str> {
        self.shown.as_ref().map(|s| s.content.as_str())
    }

    pub fn attachment(&self) -> Option<Attachment> {
        self.shown.as_ref().map(|s| s.attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(name: &str) -> BubbleAnchor {
        BubbleAnchor::CustomIcon(name.into())
    }

    #[test]
    fn starts_hidden() {
        let b = Bubble::new();
        assert!(b.is_hidden());
        assert_eq!(b.content(), None);
    }

    #[test]
    fn show_then_hide_for_owner() {
        let mut b = Bubble::new();
        b.show_for(icon("a"), "tip", Attachment::Right);
        assert!(b.is_shown_for(&icon("a")));
        assert_eq!(b.content(), Some("tip"));
        b.hide_for(&icon("a"));
        assert!(b.is_hidden());
    }

    #[test]
    fn hide_for_other_anchor_is_ignored() {
        let mut b = Bubble::new();
        b.show_for(icon("a"), "tip", Attachment::Right);
        b.hide_for(&icon("b"));
        b.hide_for(&BubbleAnchor::Pod("a".into()));
        assert!(!b.is_hidden());
    }

    #[test]
    fn new_content_replaces_anchor() {
        let mut b = Bubble::new();
        b.show_for(icon("a"), "tip", Attachment::Right);
        b.show_for(BubbleAnchor::Pod("a".into()), "policy", Attachment::Bottom);
        assert!(!b.is_shown_for(&icon("a")));
        assert_eq!(b.attachment(), Some(Attachment::Bottom));
        b.hide();
        assert!(b.is_hidden());
    }
}
