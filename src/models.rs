use serde::Deserialize;

/// Cluster record as returned by the clusters_mgmt API.
#[derive(Debug, Clone, Deserialize)]
pub struct Cluster {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterList {
    #[serde(default)]
    pub items: Vec<Cluster>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Error body the OCM API sends with any non-successful reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BadReply {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub href: Option<String>,
    pub code: Option<String>,
    pub reason: Option<String>,
    pub operation_id: Option<String>,
}
