//! Endpoint grammar, formatting and attach shorthand.
//!
//! Endpoints are strings of the form `<transport>://<address>`. This module
//! provides three things:
//!
//! - [`format_endpoint`]: the formatter every endpoint passes through on its
//!   way to the native layer. The value is always an *argument* of a fixed
//!   template, never the template itself.
//! - [`Endpoint::parse`]: the grammar used by the native layer to validate
//!   and resolve bind/connect targets.
//! - [`parse_attach`]: the `@bind` / `>connect` shorthand accepted by socket
//!   constructors.

use crate::error::{Errno, NativeError};
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

/// First port of the IANA dynamic range, used by `!` and open ranges.
pub const DYNAMIC_PORT_FIRST: u16 = 0xc000;

/// Last port of the IANA dynamic range.
pub const DYNAMIC_PORT_LAST: u16 = 0xffff;

/// Format an endpoint for a native call.
///
/// The endpoint is coerced through its `Display` implementation and used as
/// the single argument of a fixed `"{}"` template, so text such as `%s` or
/// `{}` inside it is carried through verbatim.
///
/// # Examples
///
/// ```
/// use zsock_core::endpoint::format_endpoint;
///
/// assert_eq!(format_endpoint("inproc://%s%n"), "inproc://%s%n");
/// assert_eq!(format_endpoint(format_args!("tcp://127.0.0.1:{}", 5555)), "tcp://127.0.0.1:5555");
/// ```
pub fn format_endpoint(endpoint: impl fmt::Display) -> String {
    format!("{}", endpoint)
}

/// Extract the TCP port from a resolved endpoint string.
///
/// Returns `None` for non-TCP endpoints or when the trailing `:port`
/// component is not a number (e.g. an unresolved wildcard).
///
/// # Examples
///
/// ```
/// use zsock_core::endpoint::tcp_port;
///
/// assert_eq!(tcp_port("tcp://127.0.0.1:40123"), Some(40123));
/// assert_eq!(tcp_port("tcp://[::1]:5555"), Some(5555));
/// assert_eq!(tcp_port("inproc://name:5555"), None);
/// ```
pub fn tcp_port(resolved: &str) -> Option<u16> {
    let address = resolved.strip_prefix("tcp://")?;
    let (_, port) = address.rsplit_once(':')?;
    port.parse().ok()
}

/// Transport schemes known to the endpoint grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Tcp,
    Ipc,
    Inproc,
    Pgm,
    Epgm,
    Norm,
    Tipc,
    Vmci,
    Udp,
    Ws,
    Wss,
}

impl Transport {
    /// Look up a transport by its URI scheme.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        Some(match scheme {
            "tcp" => Self::Tcp,
            "ipc" => Self::Ipc,
            "inproc" => Self::Inproc,
            "pgm" => Self::Pgm,
            "epgm" => Self::Epgm,
            "norm" => Self::Norm,
            "tipc" => Self::Tipc,
            "vmci" => Self::Vmci,
            "udp" => Self::Udp,
            "ws" => Self::Ws,
            "wss" => Self::Wss,
            _ => return None,
        })
    }

    /// The URI scheme of this transport.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Ipc => "ipc",
            Self::Inproc => "inproc",
            Self::Pgm => "pgm",
            Self::Epgm => "epgm",
            Self::Norm => "norm",
            Self::Tipc => "tipc",
            Self::Vmci => "vmci",
            Self::Udp => "udp",
            Self::Ws => "ws",
            Self::Wss => "wss",
        }
    }

    /// Whether sockets can bind/connect on this transport.
    pub fn is_supported(&self) -> bool {
        match self {
            Self::Tcp | Self::Inproc => true,
            Self::Ipc => cfg!(unix),
            _ => false,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Host part of a TCP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// `*`: all interfaces (bind only)
    Any,
    /// An IP literal
    Ip(IpAddr),
    /// A host or interface name, resolved by the native layer
    Name(String),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Ip(IpAddr::V6(ip)) => write!(f, "[{ip}]"),
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Port part of a TCP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSpec {
    /// An explicit port number
    Fixed(u16),
    /// `*`: let the operating system pick an ephemeral port
    Ephemeral,
    /// `!`, `*[a-b]` or `![a-b]`: pick a free port in a range, in order or at random
    Dynamic { first: u16, last: u16, random: bool },
}

impl PortSpec {
    /// Whether the port is chosen at bind time.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Self::Fixed(_))
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "*" => return Some(Self::Ephemeral),
            "!" => {
                return Some(Self::Dynamic {
                    first: DYNAMIC_PORT_FIRST,
                    last: DYNAMIC_PORT_LAST,
                    random: true,
                })
            }
            _ => {}
        }

        let random = s.starts_with('!');
        if let Some(range) = s
            .strip_prefix("*[")
            .or_else(|| s.strip_prefix("!["))
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let (first, last) = range.split_once('-')?;
            let first = if first.is_empty() {
                DYNAMIC_PORT_FIRST
            } else {
                first.parse().ok()?
            };
            let last = if last.is_empty() {
                DYNAMIC_PORT_LAST
            } else {
                last.parse().ok()?
            };
            if first == 0 || first > last {
                return None;
            }
            return Some(Self::Dynamic {
                first,
                last,
                random,
            });
        }

        match s.parse::<u16>().ok()? {
            0 => Some(Self::Ephemeral),
            port => Some(Self::Fixed(port)),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(port) => write!(f, "{port}"),
            Self::Ephemeral => f.write_str("*"),
            Self::Dynamic {
                first,
                last,
                random,
            } => {
                let marker = if *random { '!' } else { '*' };
                write!(f, "{marker}[{first}-{last}]")
            }
        }
    }
}

/// A parsed `host:port` TCP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TcpAddress {
    pub host: Host,
    pub port: PortSpec,
}

impl FromStr for TcpAddress {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EndpointError::InvalidTcpAddress(s.to_string());

        let (host, port) = s.rsplit_once(':').ok_or_else(invalid)?;
        let port = PortSpec::parse(port).ok_or_else(invalid)?;

        let host = if host == "*" {
            Host::Any
        } else if let Some(v6) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            Host::Ip(IpAddr::V6(v6.parse::<Ipv6Addr>().map_err(|_| invalid())?))
        } else if let Ok(ip) = host.parse::<IpAddr>() {
            Host::Ip(ip)
        } else if !host.is_empty() && !host.contains(|c: char| c.is_whitespace() || c == '/') {
            Host::Name(host.to_string())
        } else {
            return Err(invalid());
        };

        Ok(Self { host, port })
    }
}

impl fmt::Display for TcpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Transport endpoint address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// TCP transport: `tcp://host:port`
    Tcp(TcpAddress),
    /// IPC transport (Unix domain socket): `ipc:///path/to/socket` or `ipc://*`
    #[cfg(unix)]
    Ipc(PathBuf),
    /// In-process transport: `inproc://name`
    Inproc(String),
}

impl Endpoint {
    /// Parse an endpoint from a string.
    ///
    /// Supported formats:
    /// - `tcp://127.0.0.1:5555`, `tcp://*:*`, `tcp://[::1]:!`, `tcp://127.0.0.1:*[60000-60100]`
    /// - `ipc:///tmp/socket.sock`, `ipc://*` (Unix only)
    /// - `inproc://name`
    ///
    /// # Examples
    ///
    /// ```
    /// use zsock_core::endpoint::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("tcp://127.0.0.1:5555").unwrap();
    /// assert!(endpoint.is_tcp());
    ///
    /// let endpoint = Endpoint::parse("inproc://my-endpoint").unwrap();
    /// assert!(endpoint.is_inproc());
    ///
    /// assert!(Endpoint::parse("foo://bar").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, EndpointError> {
        s.parse()
    }

    /// The transport of this endpoint.
    pub fn transport(&self) -> Transport {
        match self {
            Self::Tcp(_) => Transport::Tcp,
            #[cfg(unix)]
            Self::Ipc(_) => Transport::Ipc,
            Self::Inproc(_) => Transport::Inproc,
        }
    }

    /// Returns true if this is a TCP endpoint.
    pub fn is_tcp(&self) -> bool {
        matches!(self, Endpoint::Tcp(_))
    }

    /// Returns true if this is an IPC endpoint.
    #[cfg(unix)]
    pub fn is_ipc(&self) -> bool {
        matches!(self, Endpoint::Ipc(_))
    }

    /// Returns true if this is an inproc endpoint.
    pub fn is_inproc(&self) -> bool {
        matches!(self, Endpoint::Inproc(_))
    }

    /// Returns true if the concrete address is only known after binding.
    pub fn is_wildcard(&self) -> bool {
        match self {
            Self::Tcp(addr) => addr.port.is_wildcard() || addr.host == Host::Any,
            #[cfg(unix)]
            Self::Ipc(path) => path.as_os_str() == "*",
            Self::Inproc(_) => false,
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, address) = s
            .split_once("://")
            .ok_or_else(|| EndpointError::MissingScheme(s.to_string()))?;

        let transport = Transport::from_scheme(scheme)
            .ok_or_else(|| EndpointError::UnknownScheme(s.to_string()))?;

        match transport {
            Transport::Tcp => Ok(Endpoint::Tcp(address.parse()?)),
            Transport::Ipc => parse_ipc(address),
            Transport::Inproc => {
                if address.is_empty() {
                    Err(EndpointError::InvalidInprocName(
                        "inproc name cannot be empty".to_string(),
                    ))
                } else {
                    Ok(Endpoint::Inproc(address.to_string()))
                }
            }
            other => Err(EndpointError::UnsupportedTransport(other)),
        }
    }
}

#[cfg(unix)]
fn parse_ipc(address: &str) -> Result<Endpoint, EndpointError> {
    if address.is_empty() || address.contains('\0') {
        Err(EndpointError::InvalidIpcPath(address.to_string()))
    } else {
        Ok(Endpoint::Ipc(PathBuf::from(address)))
    }
}

#[cfg(not(unix))]
fn parse_ipc(_address: &str) -> Result<Endpoint, EndpointError> {
    Err(EndpointError::IpcNotSupported)
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
            #[cfg(unix)]
            Endpoint::Ipc(path) => write!(f, "ipc://{}", path.display()),
            Endpoint::Inproc(name) => write!(f, "inproc://{}", name),
        }
    }
}

/// Errors that can occur when parsing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("Missing transport scheme in endpoint: {0}")]
    MissingScheme(String),

    #[error("Unknown transport scheme in endpoint: {0}")]
    UnknownScheme(String),

    #[error("Transport {0} is not supported")]
    UnsupportedTransport(Transport),

    #[error("Invalid TCP address: {0}")]
    InvalidTcpAddress(String),

    #[error("Invalid inproc name: {0}")]
    InvalidInprocName(String),

    #[error("Invalid IPC path: {0}")]
    InvalidIpcPath(String),

    #[error("IPC transport not supported on this platform")]
    IpcNotSupported,
}

impl EndpointError {
    /// The native error code this parse failure is reported as.
    pub fn errno(&self) -> Errno {
        match self {
            Self::UnknownScheme(_) | Self::UnsupportedTransport(_) | Self::IpcNotSupported => {
                Errno::ProtoNoSupport
            }
            Self::MissingScheme(_)
            | Self::InvalidTcpAddress(_)
            | Self::InvalidInprocName(_)
            | Self::InvalidIpcPath(_) => Errno::Inval,
        }
    }
}

impl From<EndpointError> for NativeError {
    fn from(err: EndpointError) -> Self {
        NativeError::new(err.errno(), err.to_string())
    }
}

/// What to do with one endpoint of an attach list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    Bind,
    Connect,
}

/// Split an attach list into bind/connect requests.
///
/// Endpoints are separated by commas. An endpoint prefixed with `@` is
/// bound, one prefixed with `>` is connected, and a bare endpoint is bound
/// when `serverish` is true and connected otherwise. Empty items are skipped.
///
/// # Examples
///
/// ```
/// use zsock_core::endpoint::{parse_attach, AttachMode};
///
/// let plan = parse_attach("@inproc://a,>tcp://127.0.0.1:5555,inproc://b", false);
/// assert_eq!(plan, vec![
///     (AttachMode::Bind, "inproc://a"),
///     (AttachMode::Connect, "tcp://127.0.0.1:5555"),
///     (AttachMode::Connect, "inproc://b"),
/// ]);
/// ```
pub fn parse_attach(list: &str, serverish: bool) -> Vec<(AttachMode, &str)> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            if let Some(endpoint) = item.strip_prefix('@') {
                (AttachMode::Bind, endpoint)
            } else if let Some(endpoint) = item.strip_prefix('>') {
                (AttachMode::Connect, endpoint)
            } else if serverish {
                (AttachMode::Bind, item)
            } else {
                (AttachMode::Connect, item)
            }
        })
        .collect()
}
