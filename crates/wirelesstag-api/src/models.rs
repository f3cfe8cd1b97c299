// Account-level response types
//
// Tag payloads stay as loose JSON maps (the core binds properties onto
// them); only the tag manager list is modelled explicitly.

use serde::{Deserialize, Serialize};

/// A tag manager (gateway) registered on the account, from `GetTagManagers`.
///
/// Fields beyond the handful modelled here land in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagManagerInfo {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub dbid: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
