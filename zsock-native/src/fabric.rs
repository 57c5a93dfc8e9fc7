//! Process-wide endpoint fabric.
//!
//! Every successful bind registers its resolved address here, so a second
//! bind of the same address fails with `EADDRINUSE` and connecting sockets
//! can find the bound one. Connects to an address nobody has bound yet are
//! parked and handed to the binder when it registers.
//!
//! # Features
//!
//! - **Thread-safe**: Global registries protected by `DashMap`
//! - **Weak ownership**: The fabric never keeps a socket alive
//! - **Wildcard aware**: A TCP bind on `0.0.0.0:p` serves connects to any
//!   IPv4 address on port `p`; a dual-stack bind on `[::]:p` serves both
//!   families

use crate::zsock::SocketCore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use tracing::trace;
use zsock_core::error::{Errno, NativeError, NativeResult};

/// A concrete, resolved address a socket can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Ipc(PathBuf),
    Inproc(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "tcp://{addr}"),
            #[cfg(unix)]
            Self::Ipc(path) => write!(f, "ipc://{}", path.display()),
            Self::Inproc(name) => write!(f, "inproc://{name}"),
        }
    }
}

/// Check whether a binding on `bound` accepts a connect to `wanted`.
pub(crate) fn serves(bound: &Address, wanted: &Address) -> bool {
    match (bound, wanted) {
        (Address::Tcp(bound), Address::Tcp(wanted)) => {
            if bound == wanted {
                return true;
            }
            if bound.port() != wanted.port() || !bound.ip().is_unspecified() {
                return false;
            }
            match bound.ip() {
                IpAddr::V4(_) => wanted.is_ipv4(),
                IpAddr::V6(_) => true,
            }
        }
        _ => bound == wanted,
    }
}

/// Wildcard bindings that may serve a connect to `addr`, most specific first.
fn wildcards(addr: SocketAddr) -> Vec<Address> {
    let any_v6 = Address::Tcp(SocketAddr::new(
        IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        addr.port(),
    ));
    match addr.ip() {
        IpAddr::V4(_) => vec![
            Address::Tcp(SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                addr.port(),
            )),
            any_v6,
        ],
        IpAddr::V6(_) => vec![any_v6],
    }
}

struct Binding {
    owner_id: u64,
    owner: Weak<SocketCore>,
}

struct Waiter {
    id: u64,
    socket: Weak<SocketCore>,
    endpoint: String,
}

/// Bound addresses
static BINDINGS: Lazy<DashMap<Address, Binding>> = Lazy::new(DashMap::new);

/// Connects waiting for a bind
static PENDING: Lazy<DashMap<Address, Vec<Waiter>>> = Lazy::new(DashMap::new);

/// Register `owner` as the binder of `address`.
///
/// Returns the parked connectors this binding serves, together with the
/// endpoint each of them asked for.
///
/// # Errors
///
/// `EADDRINUSE` if a live socket already holds the address.
pub(crate) fn register(
    address: &Address,
    owner: &Arc<SocketCore>,
) -> NativeResult<Vec<(Arc<SocketCore>, String)>> {
    let binding = Binding {
        owner_id: owner.id(),
        owner: Arc::downgrade(owner),
    };

    match BINDINGS.entry(address.clone()) {
        Entry::Occupied(mut entry) => {
            if entry.get().owner.strong_count() > 0 {
                return Err(NativeError::new(
                    Errno::AddrInUse,
                    format!("{address} is already bound"),
                ));
            }
            entry.insert(binding);
        }
        Entry::Vacant(entry) => {
            entry.insert(binding);
        }
    }
    trace!("[FABRIC] Registered {}", address);

    let keys: Vec<Address> = PENDING
        .iter()
        .filter(|entry| serves(address, entry.key()))
        .map(|entry| entry.key().clone())
        .collect();

    let mut waiting = Vec::new();
    for key in keys {
        if let Some((_, waiters)) = PENDING.remove(&key) {
            waiting.extend(
                waiters
                    .into_iter()
                    .filter_map(|w| w.socket.upgrade().map(|socket| (socket, w.endpoint))),
            );
        }
    }
    Ok(waiting)
}

/// Remove a registration, if it still belongs to `owner_id`.
pub(crate) fn deregister(address: &Address, owner_id: u64) {
    if BINDINGS
        .remove_if(address, |_, binding| binding.owner_id == owner_id)
        .is_some()
    {
        trace!("[FABRIC] Deregistered {}", address);
    }
}

/// Find the live socket serving `address`.
pub(crate) fn lookup(address: &Address) -> Option<Arc<SocketCore>> {
    if let Some(owner) = BINDINGS.get(address).and_then(|b| b.owner.upgrade()) {
        return Some(owner);
    }
    match address {
        Address::Tcp(addr) if !addr.ip().is_unspecified() => wildcards(*addr)
            .iter()
            .find_map(|any| BINDINGS.get(any).and_then(|b| b.owner.upgrade())),
        _ => None,
    }
}

/// Find the socket serving `address`, or park `connector` until one binds.
///
/// The lookup happens while the pending slot is held, so a concurrent
/// [`register`] either is seen here or sees the parked connector.
pub(crate) fn lookup_or_park(
    address: &Address,
    connector: &Arc<SocketCore>,
    endpoint: &str,
) -> Option<Arc<SocketCore>> {
    let found = {
        let mut waiters = PENDING.entry(address.clone()).or_default();
        let found = lookup(address);
        if found.is_none() {
            waiters.push(Waiter {
                id: connector.id(),
                socket: Arc::downgrade(connector),
                endpoint: endpoint.to_string(),
            });
            trace!("[FABRIC] Parked connect to {}", address);
        }
        found
    };
    if found.is_some() {
        PENDING.remove_if(address, |_, waiters| waiters.is_empty());
    }
    found
}

/// Drop any parked connects of `connector_id` on `address`.
pub(crate) fn unpark(address: &Address, connector_id: u64) {
    if let Some(mut waiters) = PENDING.get_mut(address) {
        waiters.retain(|w| w.id != connector_id);
    }
    PENDING.remove_if(address, |_, waiters| waiters.is_empty());
}

/// Whether a live socket holds `address`.
pub(crate) fn is_bound(address: &Address) -> bool {
    BINDINGS
        .get(address)
        .is_some_and(|b| b.owner.strong_count() > 0)
}
