use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role carried in the caller's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CANDIDATE")]
    Candidate,
    #[serde(rename = "HR")]
    Hr,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Candidate => f.write_str("CANDIDATE"),
            Role::Hr => f.write_str("HR"),
        }
    }
}
