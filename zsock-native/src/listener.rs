//! Address resolution and OS listener reservation.
//!
//! TCP and IPC binds hold a real listening socket for as long as the binding
//! lives, so ports and socket paths are allocated by the operating system and
//! are exclusive across processes. Wildcard and ranged ports are resolved
//! here.

use crate::fabric::{self, Address};
use rand::Rng;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use tracing::{debug, trace};
use zsock_core::endpoint::{Endpoint, Host, PortSpec, TcpAddress};
use zsock_core::error::{Errno, NativeError, NativeResult};

const LISTEN_BACKLOG: i32 = 128;

/// A reserved OS listener. Dropping it releases the port or path.
#[derive(Debug)]
pub(crate) enum Listener {
    Tcp(Socket),
    #[cfg(unix)]
    Ipc(IpcListener),
}

/// Unix listener that removes its socket file when dropped.
#[cfg(unix)]
#[derive(Debug)]
pub(crate) struct IpcListener {
    _listener: std::os::unix::net::UnixListener,
    path: std::path::PathBuf,
}

#[cfg(unix)]
impl Drop for IpcListener {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Outcome of a successful bind reservation.
#[derive(Debug)]
pub(crate) struct Reservation {
    /// Registry key
    pub address: Address,
    /// Resolved endpoint reported as `last_endpoint`
    pub endpoint: String,
    /// Held OS resource, if the transport has one
    pub listener: Option<Listener>,
}

/// Reserve the resources behind a bind.
pub(crate) fn reserve(endpoint: &Endpoint, ipv6: bool) -> NativeResult<Reservation> {
    match endpoint {
        Endpoint::Tcp(addr) => reserve_tcp(addr, ipv6),
        #[cfg(unix)]
        Endpoint::Ipc(path) => reserve_ipc(path),
        Endpoint::Inproc(name) => {
            let address = Address::Inproc(name.clone());
            Ok(Reservation {
                endpoint: address.to_string(),
                address,
                listener: None,
            })
        }
    }
}

/// Resolve the address a connect targets.
///
/// Connects need a concrete address: `*` hosts, wildcard ports and
/// `ipc://*` are rejected with `EINVAL`.
pub(crate) fn resolve_connect(endpoint: &Endpoint, ipv6: bool) -> NativeResult<Address> {
    match endpoint {
        Endpoint::Tcp(addr) => {
            let port = match addr.port {
                PortSpec::Fixed(port) => port,
                _ => {
                    return Err(NativeError::invalid(format!(
                        "cannot connect to wildcard port in {addr}"
                    )))
                }
            };
            if addr.host == Host::Any {
                return Err(NativeError::invalid(format!(
                    "cannot connect to wildcard host in {addr}"
                )));
            }
            let ip = resolve_host(&addr.host, ipv6)?;
            Ok(Address::Tcp(SocketAddr::new(ip, port)))
        }
        #[cfg(unix)]
        Endpoint::Ipc(path) => {
            if path.as_os_str() == "*" {
                return Err(NativeError::invalid("cannot connect to ipc://*"));
            }
            Ok(Address::Ipc(path.clone()))
        }
        Endpoint::Inproc(name) => Ok(Address::Inproc(name.clone())),
    }
}

fn resolve_host(host: &Host, ipv6: bool) -> NativeResult<IpAddr> {
    match host {
        Host::Any if ipv6 => Ok(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
        Host::Any => Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        Host::Ip(IpAddr::V6(_)) if !ipv6 => Err(NativeError::new(
            Errno::NoDev,
            format!("{host} needs the ipv6 option"),
        )),
        Host::Ip(ip) => Ok(*ip),
        Host::Name(name) if name == "localhost" => Ok(if ipv6 {
            IpAddr::V6(Ipv6Addr::LOCALHOST)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }),
        Host::Name(name) => {
            let candidates = (name.as_str(), 0)
                .to_socket_addrs()
                .map_err(|e| NativeError::new(Errno::NoDev, format!("{name}: {e}")))?;
            candidates
                .map(|addr| addr.ip())
                .find(|ip| ipv6 || ip.is_ipv4())
                .ok_or_else(|| {
                    NativeError::new(Errno::NoDev, format!("{name} has no usable address"))
                })
        }
    }
}

fn reserve_tcp(addr: &TcpAddress, ipv6: bool) -> NativeResult<Reservation> {
    let ip = resolve_host(&addr.host, ipv6)?;

    let socket = match addr.port {
        PortSpec::Fixed(port) => tcp_listener(SocketAddr::new(ip, port))?,
        PortSpec::Ephemeral => tcp_listener(SocketAddr::new(ip, 0))?,
        PortSpec::Dynamic {
            first,
            last,
            random,
        } => listen_in_range(ip, first, last, random)?,
    };

    let local = socket
        .local_addr()?
        .as_socket()
        .ok_or_else(|| NativeError::new(Errno::Io, "listener has no socket address"))?;
    debug!("[LISTENER] Reserved tcp {}", local);

    let address = Address::Tcp(local);
    Ok(Reservation {
        endpoint: address.to_string(),
        address,
        listener: Some(Listener::Tcp(socket)),
    })
}

fn listen_in_range(ip: IpAddr, first: u16, last: u16, random: bool) -> NativeResult<Socket> {
    let span = u32::from(last - first) + 1;
    let start = if random {
        rand::thread_rng().gen_range(0..span)
    } else {
        0
    };

    for step in 0..span {
        let port = first as u32 + (start + step) % span;
        match tcp_listener(SocketAddr::new(ip, port as u16)) {
            Ok(socket) => return Ok(socket),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                trace!("[LISTENER] Port {} in use, trying next", port);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(NativeError::new(
        Errno::AddrInUse,
        format!("no free port in {first}-{last}"),
    ))
}

fn tcp_listener(addr: SocketAddr) -> io::Result<Socket> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    #[cfg(unix)]
    socket.set_reuse_address(true)?;
    if addr.is_ipv6() {
        // Dual-stack where the platform allows it
        let _ = socket.set_only_v6(false);
    }
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    Ok(socket)
}

#[cfg(unix)]
fn reserve_ipc(path: &std::path::Path) -> NativeResult<Reservation> {
    let path = if path.as_os_str() == "*" {
        let tag: u64 = rand::thread_rng().gen();
        std::env::temp_dir().join(format!("zsock-{}-{tag:016x}.ipc", std::process::id()))
    } else {
        path.to_path_buf()
    };

    let address = Address::Ipc(path.clone());
    if fabric::is_bound(&address) {
        return Err(NativeError::new(
            Errno::AddrInUse,
            format!("{address} is already bound"),
        ));
    }

    // Stale socket files from dead processes are replaced, as libzmq does
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    let listener = std::os::unix::net::UnixListener::bind(&path)?;
    debug!("[LISTENER] Reserved ipc {}", path.display());

    Ok(Reservation {
        endpoint: address.to_string(),
        address,
        listener: Some(Listener::Ipc(IpcListener {
            _listener: listener,
            path,
        })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(s: &str) -> Endpoint {
        Endpoint::parse(s).unwrap()
    }

    #[test]
    fn test_ephemeral_port_is_assigned() {
        let reservation = reserve(&ep("tcp://127.0.0.1:*"), false).unwrap();
        match reservation.address {
            Address::Tcp(addr) => assert_ne!(addr.port(), 0),
            other => panic!("unexpected address {other:?}"),
        }
        assert!(reservation.endpoint.starts_with("tcp://127.0.0.1:"));
    }

    #[test]
    fn test_fixed_port_is_exclusive() {
        let first = reserve(&ep("tcp://127.0.0.1:*"), false).unwrap();
        let err = reserve(&ep(&first.endpoint), false).unwrap_err();
        assert_eq!(err.errno, Errno::AddrInUse);
    }

    #[test]
    fn test_range_port_stays_in_range() {
        let reservation = reserve(&ep("tcp://127.0.0.1:![50000-50100]"), false).unwrap();
        match reservation.address {
            Address::Tcp(addr) => assert!((50000..=50100).contains(&addr.port())),
            other => panic!("unexpected address {other:?}"),
        }
    }

    #[test]
    fn test_any_host_binds_unspecified() {
        let reservation = reserve(&ep("tcp://*:*"), false).unwrap();
        assert!(reservation.endpoint.starts_with("tcp://0.0.0.0:"));
    }

    #[test]
    fn test_connect_rejects_wildcards() {
        let err = resolve_connect(&ep("tcp://127.0.0.1:*"), false).unwrap_err();
        assert_eq!(err.errno, Errno::Inval);
        let err = resolve_connect(&ep("tcp://*:5555"), false).unwrap_err();
        assert_eq!(err.errno, Errno::Inval);
    }

    #[test]
    fn test_connect_localhost() {
        let address = resolve_connect(&ep("tcp://localhost:5555"), false).unwrap();
        assert_eq!(address, Address::Tcp("127.0.0.1:5555".parse().unwrap()));
    }

    #[test]
    fn test_ipv6_literal_needs_option() {
        let err = resolve_connect(&ep("tcp://[::1]:5555"), false).unwrap_err();
        assert_eq!(err.errno, Errno::NoDev);
        assert!(resolve_connect(&ep("tcp://[::1]:5555"), true).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_ipc_wildcard_generates_path() {
        let reservation = reserve(&ep("ipc://*"), false).unwrap();
        let path = match &reservation.address {
            Address::Ipc(path) => path.clone(),
            other => panic!("unexpected address {other:?}"),
        };
        assert!(path.exists());
        drop(reservation);
        assert!(!path.exists());
    }
}
