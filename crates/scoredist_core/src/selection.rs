//! Bucket visibility, hover and display mode.
//!
//! Pure view state: transitions never touch the series or playback.

use serde::{Deserialize, Serialize};

use crate::model::BucketId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Percentage,
    Count,
}

impl DisplayMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Percentage => DisplayMode::Count,
            DisplayMode::Count => DisplayMode::Percentage,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Percentage => "Percentage",
            DisplayMode::Count => "Count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    ToggleBucket(BucketId),
    ToggleAll(bool),
    SetHovered(Option<BucketId>),
    SetDisplayMode(DisplayMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityState {
    visible: [bool; BucketId::COUNT],
    pub hovered: Option<BucketId>,
    pub mode: DisplayMode,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            visible: [true; BucketId::COUNT],
            hovered: None,
            mode: DisplayMode::default(),
        }
    }
}

impl VisibilityState {
    #[must_use]
    pub fn apply(mut self, event: SelectionEvent) -> Self {
        match event {
            SelectionEvent::ToggleBucket(bucket) => {
                let slot = &mut self.visible[bucket.index()];
                *slot = !*slot;
            }
            SelectionEvent::ToggleAll(visible) => self.visible = [visible; BucketId::COUNT],
            SelectionEvent::SetHovered(bucket) => self.hovered = bucket,
            SelectionEvent::SetDisplayMode(mode) => self.mode = mode,
        }
        self
    }

    #[must_use]
    pub fn is_visible(&self, bucket: BucketId) -> bool {
        self.visible[bucket.index()]
    }

    /// Visible buckets in stacking order.
    pub fn visible_buckets(&self) -> impl Iterator<Item = BucketId> + '_ {
        BucketId::ALL.into_iter().filter(|b| self.is_visible(*b))
    }

    #[must_use]
    pub fn any_visible(&self) -> bool {
        self.visible.iter().any(|v| *v)
    }

    /// Hover target after `current` when stepping through the legend:
    /// none, then each bucket in order, then none again.
    #[must_use]
    pub fn next_hover(current: Option<BucketId>) -> Option<BucketId> {
        match current {
            None => Some(BucketId::ALL[0]),
            Some(bucket) => BucketId::from_index(bucket.index() + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_bucket_flips_only_that_bucket() {
        let state = VisibilityState::default().apply(SelectionEvent::ToggleBucket(BucketId::From40To60));
        assert!(!state.is_visible(BucketId::From40To60));
        assert_eq!(state.visible_buckets().count(), 4);

        let state = state.apply(SelectionEvent::ToggleBucket(BucketId::From40To60));
        assert_eq!(state, VisibilityState::default());
    }

    #[test]
    fn test_toggle_all() {
        let hidden = VisibilityState::default().apply(SelectionEvent::ToggleAll(false));
        assert!(!hidden.any_visible());
        let shown = hidden.apply(SelectionEvent::ToggleAll(true));
        assert_eq!(shown, VisibilityState::default());
    }

    #[test]
    fn test_hover_and_mode_leave_visibility_alone() {
        let start = VisibilityState::default().apply(SelectionEvent::ToggleBucket(BucketId::From0To20));
        let next = start
            .apply(SelectionEvent::SetHovered(Some(BucketId::From0To20)))
            .apply(SelectionEvent::SetDisplayMode(DisplayMode::Count));
        for b in BucketId::ALL {
            assert_eq!(start.is_visible(b), next.is_visible(b));
        }
        assert_eq!(next.hovered, Some(BucketId::From0To20));
        assert_eq!(next.mode, DisplayMode::Count);
    }

    #[test]
    fn test_next_hover_cycles() {
        let mut hover = None;
        let mut seen = Vec::new();
        for _ in 0..6 {
            hover = VisibilityState::next_hover(hover);
            seen.push(hover);
        }
        assert_eq!(seen[0], Some(BucketId::From0To20));
        assert_eq!(seen[4], Some(BucketId::From80To100));
        assert_eq!(seen[5], None);
    }
}
