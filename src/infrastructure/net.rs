//! Discovery Address Resolution
//!
//! Turns a listen address into the host:port peers can actually reach,
//! resolving wildcard binds to an outbound-routable IP.

use std::net::{IpAddr, UdpSocket};
use thiserror::Error;

/// Well-known address used to discover the outbound-facing IP. No packet
/// is sent; connecting a UDP socket only asks the kernel for a route.
const OUTBOUND_PROBE_ADDR: &str = "8.8.8.8:80";

/// Address resolution errors. Fatal at service construction time.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("incorrect listen address {0}")]
    InvalidListenAddr(String),
    #[error("invalid port in listen address {0}")]
    InvalidPort(String),
    #[error("no routable local IP")]
    NoRoutableIp,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolve the IP this host uses for outbound traffic.
pub fn resolve_outbound_ip() -> Result<IpAddr, ResolveError> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(OUTBOUND_PROBE_ADDR)?;
    let local = socket.local_addr()?;
    match local.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Ok(IpAddr::V4(ip)),
        _ => Err(ResolveError::NoRoutableIp),
    }
}

/// Split a listen address into the (host, port) peers should be told
/// about.
///
/// `override_ip`, when set, replaces the listen host entirely. An empty
/// or wildcard host falls back to the outbound-facing IP of this machine.
pub fn split_listen_addr(
    listen: &str,
    override_ip: Option<&str>,
) -> Result<(String, u16), ResolveError> {
    let (raw_host, raw_port) = listen
        .rsplit_once(':')
        .ok_or_else(|| ResolveError::InvalidListenAddr(listen.to_string()))?;
    let port: u16 = raw_port
        .trim()
        .parse()
        .map_err(|_| ResolveError::InvalidPort(listen.to_string()))?;

    let mut host = match override_ip {
        Some(ip) => ip.trim().to_string(),
        None => raw_host
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string(),
    };
    if is_wildcard(&host) {
        host = resolve_outbound_ip()?.to_string();
    }
    Ok((host, port))
}

fn is_wildcard(host: &str) -> bool {
    host.is_empty() || host == "0.0.0.0" || host == "::"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_explicit_host() {
        let (host, port) = split_listen_addr("192.168.1.5:8080", None).unwrap();
        assert_eq!(host, "192.168.1.5");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_split_with_override() {
        let (host, port) = split_listen_addr("0.0.0.0:9000", Some("10.1.2.3")).unwrap();
        assert_eq!(host, "10.1.2.3");
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_split_override_beats_explicit_host() {
        let (host, _) = split_listen_addr("192.168.1.5:8080", Some("10.1.2.3")).unwrap();
        assert_eq!(host, "10.1.2.3");
    }

    #[test]
    fn test_split_missing_colon() {
        let result = split_listen_addr("8080", None);
        assert!(matches!(result, Err(ResolveError::InvalidListenAddr(_))));
    }

    #[test]
    fn test_split_bad_port() {
        let result = split_listen_addr("127.0.0.1:http", None);
        assert!(matches!(result, Err(ResolveError::InvalidPort(_))));
    }

    #[test]
    fn test_split_port_out_of_range() {
        let result = split_listen_addr("127.0.0.1:70000", None);
        assert!(matches!(result, Err(ResolveError::InvalidPort(_))));
    }

    #[test]
    fn test_wildcard_host_resolves_to_concrete_ip() {
        // Resolution needs a route to exist; when it does, the result must
        // never echo the wildcard back.
        if let Ok((host, port)) = split_listen_addr("0.0.0.0:9000", None) {
            assert!(!host.is_empty());
            assert_ne!(host, "0.0.0.0");
            assert_eq!(port, 9000);
        }
    }

    #[test]
    fn test_empty_host_with_override() {
        let (host, port) = split_listen_addr(":7000", Some("172.16.0.9")).unwrap();
        assert_eq!(host, "172.16.0.9");
        assert_eq!(port, 7000);
    }

    #[test]
    fn test_is_wildcard() {
        assert!(is_wildcard(""));
        assert!(is_wildcard("0.0.0.0"));
        assert!(is_wildcard("::"));
        assert!(!is_wildcard("127.0.0.1"));
    }
}
