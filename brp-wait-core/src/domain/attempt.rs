//! Single poll attempt

/// What happened when the endpoint was probed once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// HTTP 200 with a JSON body
    Ready { body: String },

    /// Nothing is listening yet
    Refused,

    /// The server answered with a non-200 status
    Rejected { status: u16 },

    /// Any other transport or decoding failure
    Failed { error: String },
}

impl AttemptOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Whether the failure should be shown to the user
    ///
    /// Refusals are expected while the remote boots and non-200 replies were
    /// never reported, so only `Failed` is.
    pub fn should_report(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
