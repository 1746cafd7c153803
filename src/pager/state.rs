/// Iteration state definitions
///
/// `NotStarted` -> `FetchingPage` -> `HasPage` -> (`FetchingPage` ...) ->
/// `Exhausted`, with `Failed` reachable from `FetchingPage`.
use std::fmt;

/// Current state of a paged iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterState {
    /// Nothing has been fetched for enumeration yet
    NotStarted,

    /// A page request is about to be sent or is in flight
    FetchingPage,

    /// Items of the current page are being handed out
    HasPage,

    /// All items were yielded, or enumeration halted on an inconsistency
    Exhausted,

    /// A page fetch failed; the error was returned to the caller
    Failed,
}

impl IterState {
    /// Returns true if no further items will be produced
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }

    /// Returns true if enumeration has begun and not yet ended
    pub fn is_active(&self) -> bool {
        matches!(self, Self::FetchingPage | Self::HasPage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::FetchingPage => "fetching_page",
            Self::HasPage => "has_page",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for IterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
