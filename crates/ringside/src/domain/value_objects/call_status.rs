//! CallStatus - Canonical lifecycle of a call, and the provider vocabulary mapped onto it

use serde::{Deserialize, Serialize};

/// Canonical call status
///
/// Ordered by rank: a record only ever moves to a status of strictly
/// higher rank, and `Completed` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    #[default]
    Initiated,
    InProgress,
    Completed,
}

impl CallStatus {
    pub fn rank(self) -> u8 {
        match self {
            CallStatus::Initiated => 0,
            CallStatus::InProgress => 1,
            CallStatus::Completed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == CallStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CallStatus::Initiated => "initiated",
            CallStatus::InProgress => "in-progress",
            CallStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initiated" => Ok(CallStatus::Initiated),
            "in-progress" => Ok(CallStatus::InProgress),
            "completed" => Ok(CallStatus::Completed),
            _ => Err(format!("Unknown call status: {}", s)),
        }
    }
}

/// Raw status vocabulary reported by the voice provider
///
/// Anything not listed is kept verbatim in `Other` and maps to no
/// canonical status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderStatus {
    Queued,
    Ringing,
    InProgress,
    Forwarding,
    Completed,
    Failed,
    Ended,
    Other(String),
}

impl ProviderStatus {
    /// Fixed mapping onto the canonical statuses
    pub fn canonical(&self) -> Option<CallStatus> {
        match self {
            ProviderStatus::Ringing | ProviderStatus::InProgress => Some(CallStatus::InProgress),
            ProviderStatus::Completed | ProviderStatus::Failed | ProviderStatus::Ended => {
                Some(CallStatus::Completed)
            }
            ProviderStatus::Queued | ProviderStatus::Forwarding | ProviderStatus::Other(_) => None,
        }
    }
}

impl From<&str> for ProviderStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "queued" => ProviderStatus::Queued,
            "ringing" => ProviderStatus::Ringing,
            "in-progress" => ProviderStatus::InProgress,
            "forwarding" => ProviderStatus::Forwarding,
            "completed" => ProviderStatus::Completed,
            "failed" => ProviderStatus::Failed,
            "ended" => ProviderStatus::Ended,
            _ => ProviderStatus::Other(raw.to_string()),
        }
    }
}

impl From<String> for ProviderStatus {
    fn from(raw: String) -> Self {
        ProviderStatus::from(raw.as_str())
    }
}

impl From<ProviderStatus> for String {
    fn from(status: ProviderStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::Queued => write!(f, "queued"),
            ProviderStatus::Ringing => write!(f, "ringing"),
            ProviderStatus::InProgress => write!(f, "in-progress"),
            ProviderStatus::Forwarding => write!(f, "forwarding"),
            ProviderStatus::Completed => write!(f, "completed"),
            ProviderStatus::Failed => write!(f, "failed"),
            ProviderStatus::Ended => write!(f, "ended"),
            ProviderStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Where a status update came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Webhook,
    Poll,
}

impl std::fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOrigin::Webhook => write!(f, "webhook"),
            EventOrigin::Poll => write!(f, "poll"),
        }
    }
}
