use serde::{Deserialize, Serialize};

/// An account that can be offered for export. The owner account never
/// carries the home flag, even if the remote service marks it otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub username: String,
    pub home: bool,
}
