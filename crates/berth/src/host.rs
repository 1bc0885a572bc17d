//! Deployment-reachable host discovery.
//!
//! A test server bound to `0.0.0.0` is reachable on every interface, but a
//! browser running on another machine needs one concrete address. This
//! module picks the first site-local (private, not publicly routable)
//! address from the machine's non-loopback, non-virtual interfaces.
//!
//! Among multiple qualifying interfaces the result depends on enumeration
//! order; single-homed test and dev machines are the target environment.
//! There is no fallback: a machine with only a loopback interface fails
//! with [`ServerError::NoSuitableAddress`].

use crate::error::{Result, ServerError};
use std::net::IpAddr;
use tracing::debug;

/// Interface name prefixes that identify container/VM/tunnel interfaces.
/// Addresses on these are site-local but not reachable from a browser on
/// another machine.
const VIRTUAL_PREFIXES: &[&str] = &[
    "docker", "veth", "virbr", "vmnet", "br-", "tun", "tap", "utun", "zt",
];

/// Finds the address where a server on this machine is reachable from outside.
///
/// # Errors
///
/// Returns `InterfaceEnumeration` if the interface list cannot be obtained,
/// and `NoSuitableAddress` if no non-loopback, non-virtual interface carries
/// a site-local address.
pub fn deployment_host() -> Result<String> {
    let interfaces = if_addrs::get_if_addrs().map_err(ServerError::InterfaceEnumeration)?;

    select_site_local(interfaces.into_iter().map(|iface| Candidate {
        ip: iface.ip(),
        name: iface.name,
    }))
}

/// One interface address under consideration.
#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    ip: IpAddr,
}

/// Returns the first site-local candidate, skipping loopback and virtual
/// interfaces. Factored out of [`deployment_host`] so selection rules are
/// testable without real network interfaces.
fn select_site_local(candidates: impl IntoIterator<Item = Candidate>) -> Result<String> {
    for candidate in candidates {
        if candidate.ip.is_loopback() || is_virtual_name(&candidate.name) {
            continue;
        }
        if is_site_local(candidate.ip) {
            debug!(
                interface = %candidate.name,
                address = %candidate.ip,
                "selected deployment host"
            );
            return Ok(candidate.ip.to_string());
        }
    }

    Err(ServerError::NoSuitableAddress)
}

fn is_virtual_name(name: &str) -> bool {
    VIRTUAL_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Site-local means RFC 1918 for IPv4 and `fec0::/10` for IPv6.
fn is_site_local(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfec0,
    }
}
