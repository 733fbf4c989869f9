/// Top-level screen identifiers and the navigation state machine
///
/// Exactly one View is active at a time; it is the root of what renders.
/// Every transition is caused by an explicit named action, never a side
/// effect of rendering.

/// The single active top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Initial landing screen with the hero and start button
    Landing,
    /// Photo capture / file picker screen
    Capture,
    /// Style selection and tuning for the captured photo
    Studio,
    /// Before/after comparison of the current transformation
    Results,
    /// Grid of past transformation results
    History,
}

/// Named user- or event-driven actions that can move between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    /// User starts a new session from the landing screen
    StartCapture,
    /// A captured photo was accepted
    PhotoAccepted,
    /// The external service finished a transformation
    TransformationCompleted,
    /// User goes back to tune or pick another style
    BackToStudio,
    /// User opens the history grid
    OpenHistory,
    /// User selected a past result to review
    SelectHistoryItem,
    /// Explicit reset (header/logo navigation)
    Reset,
}

impl View {
    /// Apply a named action to this view
    ///
    /// Returns the target view for a defined edge, or `None` when the
    /// action is undefined from this view (the view stays unchanged).
    pub fn apply(self, action: ViewAction) -> Option<View> {
        // Reset is valid from every view
        if action == ViewAction::Reset {
            return Some(View::Landing);
        }

        match (self, action) {
            (View::Landing, ViewAction::StartCapture) => Some(View::Capture),
            (View::Capture, ViewAction::PhotoAccepted) => Some(View::Studio),
            (View::Studio, ViewAction::TransformationCompleted) => Some(View::Results),
            (View::Results, ViewAction::BackToStudio) => Some(View::Studio),
            (View::Results, ViewAction::OpenHistory) => Some(View::History),
            (View::History, ViewAction::SelectHistoryItem) => Some(View::Results),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defined_edges() {
        assert_eq!(
            View::Landing.apply(ViewAction::StartCapture),
            Some(View::Capture)
        );
        assert_eq!(
            View::Capture.apply(ViewAction::PhotoAccepted),
            Some(View::Studio)
        );
        assert_eq!(
            View::Studio.apply(ViewAction::TransformationCompleted),
            Some(View::Results)
        );
        assert_eq!(
            View::Results.apply(ViewAction::BackToStudio),
            Some(View::Studio)
        );
        assert_eq!(
            View::Results.apply(ViewAction::OpenHistory),
            Some(View::History)
        );
        assert_eq!(
            View::History.apply(ViewAction::SelectHistoryItem),
            Some(View::Results)
        );
    }

    #[test]
    fn test_undefined_actions_leave_view_unchanged() {
        assert_eq!(View::Landing.apply(ViewAction::PhotoAccepted), None);
        assert_eq!(View::Landing.apply(ViewAction::OpenHistory), None);
        assert_eq!(View::Capture.apply(ViewAction::StartCapture), None);
        assert_eq!(View::Capture.apply(ViewAction::TransformationCompleted), None);
        assert_eq!(View::Studio.apply(ViewAction::PhotoAccepted), None);
        assert_eq!(View::Studio.apply(ViewAction::OpenHistory), None);
        assert_eq!(View::Results.apply(ViewAction::SelectHistoryItem), None);
        assert_eq!(View::History.apply(ViewAction::BackToStudio), None);
    }

    #[test]
    fn test_reset_from_every_view() {
        for view in [
            View::Landing,
            View::Capture,
            View::Studio,
            View::Results,
            View::History,
        ] {
            assert_eq!(view.apply(ViewAction::Reset), Some(View::Landing));
        }
    }
}
