//! Per-request client context.
//!
//! The host pipeline resolves site, user and address information from the
//! request and passes it in explicitly; nothing here reads ambient state.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::keys::LOOPBACK_IP;

pub const REAL_IP_HEADER: &str = "x-real-ip";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Candidate sources for the client address, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpSources {
    /// Value of the real-IP header set by a trusted proxy.
    pub real_ip: Option<String>,
    /// Value of the forwarded-for header; may be a comma-separated chain.
    pub forwarded_for: Option<String>,
    /// Address of the direct peer connection.
    pub remote_addr: Option<String>,
}

impl IpSources {
    /// Resolve the client address.
    ///
    /// Real-IP wins over forwarded-for, which wins over the direct peer
    /// address. Blank values are skipped. Falls back to `127.0.0.1`.
    pub fn resolve(&self) -> String {
        non_blank(self.real_ip.as_deref())
            .or_else(|| self.forwarded_for.as_deref().and_then(first_forwarded_hop))
            .or_else(|| non_blank(self.remote_addr.as_deref()))
            .unwrap_or(LOOPBACK_IP)
            .to_string()
    }
}

/// Everything a processor knows about the client behind a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientContext {
    pub site_id: Option<i64>,
    pub site_name: Option<String>,
    /// `0` means anonymous or system.
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub ip: IpSources,
}

impl ClientContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from request headers and the peer address.
    ///
    /// Header names match case-insensitively.
    pub fn from_request<I, K, V>(headers: I, remote_addr: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut ip = IpSources {
            remote_addr: non_blank(remote_addr).map(str::to_string),
            ..IpSources::default()
        };

        for (name, value) in headers {
            let name = name.as_ref();
            let value = non_blank(Some(value.as_ref())).map(str::to_string);
            if name.eq_ignore_ascii_case(REAL_IP_HEADER) {
                ip.real_ip = ip.real_ip.or(value);
            } else if name.eq_ignore_ascii_case(FORWARDED_FOR_HEADER) {
                ip.forwarded_for = ip.forwarded_for.or(value);
            }
        }

        Self {
            ip,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_site(mut self, site_id: i64, site_name: impl Into<String>) -> Self {
        self.site_id = Some(site_id);
        self.site_name = Some(site_name.into());
        self
    }

    pub fn with_user(mut self, user_id: i64, user_name: impl Into<String>) -> Self {
        self.user_id = Some(user_id);
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_ip_sources(mut self, ip: IpSources) -> Self {
        self.ip = ip;
        self
    }

    pub fn client_ip(&self) -> String {
        self.ip.resolve()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The originating client is the first entry of a forwarded-for chain.
fn first_forwarded_hop(value: &str) -> Option<&str> {
    value.split(',').map(str::trim).find(|hop| !hop.is_empty())
}
