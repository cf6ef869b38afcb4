//! Poll run outcome

/// Terminal state of a poll run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The endpoint answered before the deadline
    Ready {
        /// Raw response body
        body: String,
        /// Attempts made, including the successful one
        attempts: u32,
    },

    /// The deadline passed without a successful answer
    TimedOut {
        /// Attempts made
        attempts: u32,
    },
}

impl PollOutcome {
    /// Process exit status: 0 when ready, 1 on timeout
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Ready { .. } => 0,
            Self::TimedOut { .. } => 1,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts, .. } | Self::TimedOut { attempts } => *attempts,
        }
    }
}
