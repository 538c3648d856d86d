use std::net::IpAddr;

use serde::Serialize;

/// Transport-level metadata attached to a request, used only for audit logs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClientInfo {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}
