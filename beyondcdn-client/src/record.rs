use serde::{Deserialize, Serialize};

/// One entry of a storage zone directory listing, as sent by the service.
///
/// `path` is the remote directory, starting with `/{storage_zone_name}/` and
/// ending in `/`; `object_name` is the leaf name. Timestamps are kept as the
/// raw strings the service sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteObject {
    pub guid: String,
    pub storage_zone_name: String,
    pub path: String,
    pub object_name: String,
    pub length: u64,
    pub last_changed: String,
    pub date_created: String,
    pub server_id: i64,
    pub is_directory: bool,
    pub user_id: String,
    #[serde(default)]
    pub content_type: String,
    pub storage_zone_id: i64,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub replicated_zones: Option<String>,
}
