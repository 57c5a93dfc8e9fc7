//! The native socket handle.
//!
//! A [`Zsock`] owns one socket: its bindings, its connects, the links to its
//! peers and an inbox of delivered messages. Peers are other `Zsock`s in the
//! same process, found through the [fabric](crate::fabric). Sending a message
//! pushes it straight into the chosen peer's inbox.
//!
//! Routing follows the socket type:
//!
//! - PUB/XPUB fan out to every subscribed peer, dropping for peers whose
//!   queue is at the smaller of our send HWM and their receive HWM
//! - ROUTER addresses peers by the leading routing-id frame
//! - REP replies to the requester of the last received message
//! - REQ enforces strict send/receive alternation
//! - SUB/XSUB filter received messages by subscription prefix
//! - all other types round-robin across peers, blocking while there are none

use crate::delegate::ZsockDelegate;
use crate::fabric::{self, Address};
use crate::listener::{self, Listener};
use bytes::Bytes;
use flume::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;
use tracing::{debug, trace};
use zsock_core::endpoint::{format_endpoint, Endpoint};
use zsock_core::error::{Errno, NativeError, NativeResult};
use zsock_core::monitor::{create_monitor, SocketEvent, SocketEventSender, SocketMonitor};
use zsock_core::options::{Mechanism, SocketOptions};
use zsock_core::socket_type::SocketType;

static NEXT_SOCKET_ID: AtomicU64 = AtomicU64::new(1);

/// Routing id a ROUTER assigns to a peer that did not set one.
///
/// Auto-generated ids start with a zero byte, which user ids may not.
fn auto_routing_id(socket_id: u64) -> Bytes {
    let mut id = Vec::with_capacity(5);
    id.push(0u8);
    id.extend_from_slice(&(socket_id as u32).to_be_bytes());
    Bytes::from(id)
}

/// Queue limit between a sender and a receiver: the smaller non-zero HWM.
fn queue_limit(send_hwm: usize, recv_hwm: usize) -> usize {
    match (send_hwm, recv_hwm) {
        (0, hwm) | (hwm, 0) => hwm,
        (a, b) => a.min(b),
    }
}

fn routing_id_for(options: &SocketOptions, socket_id: u64) -> Bytes {
    options
        .routing_id
        .clone()
        .unwrap_or_else(|| auto_routing_id(socket_id))
}

#[derive(Debug)]
enum Delivery {
    Message { from: u64, frames: Vec<Bytes> },
    /// Wakes receivers after close
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// We connected to this peer
    Connected,
    /// This peer connected to one of our bindings
    Accepted,
}

#[derive(Debug)]
struct Peer {
    id: u64,
    socket: Weak<SocketCore>,
    socket_type: SocketType,
    routing_id: Bytes,
    /// Our connect endpoint (Connected) or our resolved binding (Accepted)
    endpoint: String,
    role: Role,
}

#[derive(Debug)]
struct Binding {
    requested: String,
    endpoint: String,
    address: Address,
    _listener: Option<Listener>,
}

#[derive(Debug)]
struct Connect {
    endpoint: String,
    address: Address,
}

#[derive(Debug, Default)]
struct State {
    peers: Vec<Peer>,
    bindings: Vec<Binding>,
    connects: Vec<Connect>,
    last_endpoint: Option<String>,
    cursor: usize,
    /// REP: requester and envelope of the request being answered
    reply_to: Option<(u64, Vec<Bytes>)>,
    /// REQ: a request is outstanding
    awaiting_reply: bool,
}

/// Shared socket state. Peers and the fabric only hold weak references.
#[derive(Debug)]
pub(crate) struct SocketCore {
    id: u64,
    socket_type: SocketType,
    inbox_tx: Sender<Delivery>,
    inbox_rx: Receiver<Delivery>,
    state: Mutex<State>,
    /// Signalled when a peer is added or the socket closes
    peer_ready: Condvar,
    options: Mutex<SocketOptions>,
    closed: AtomicBool,
    monitor: Mutex<Option<SocketEventSender>>,
}

impl SocketCore {
    fn new(socket_type: SocketType, options: SocketOptions) -> Arc<Self> {
        let (inbox_tx, inbox_rx) = flume::unbounded();
        Arc::new(Self {
            id: NEXT_SOCKET_ID.fetch_add(1, Ordering::Relaxed),
            socket_type,
            inbox_tx,
            inbox_rx,
            state: Mutex::new(State::default()),
            peer_ready: Condvar::new(),
            options: Mutex::new(options),
            closed: AtomicBool::new(false),
            monitor: Mutex::new(None),
        })
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> NativeResult<()> {
        if self.is_closed() {
            Err(NativeError::terminated())
        } else {
            Ok(())
        }
    }

    fn emit(&self, event: SocketEvent) {
        if let Some(monitor) = self.monitor.lock().as_ref() {
            let _ = monitor.send(event);
        }
    }

    fn deliver(&self, from: u64, frames: Vec<Bytes>) {
        // Unbounded and we hold the receiver, so this cannot fail
        let _ = self.inbox_tx.send(Delivery::Message { from, frames });
    }

    fn peer_count(&self) -> usize {
        self.state.lock().peers.len()
    }

    fn add_peer(&self, peer: Peer) {
        self.state.lock().peers.push(peer);
        self.peer_ready.notify_all();
    }

    fn take_peers(&self, predicate: impl Fn(&Peer) -> bool) -> Vec<Peer> {
        let mut state = self.state.lock();
        let (taken, kept): (Vec<Peer>, Vec<Peer>) = std::mem::take(&mut state.peers)
            .into_iter()
            .partition(|p| predicate(p));
        state.peers = kept;
        taken
    }

    fn peer_socket(&self, id: u64) -> Option<Arc<SocketCore>> {
        self.state
            .lock()
            .peers
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.socket.upgrade())
    }

    fn routing_id_of(&self, id: u64) -> Bytes {
        self.state
            .lock()
            .peers
            .iter()
            .find(|p| p.id == id)
            .map_or_else(|| auto_routing_id(id), |p| p.routing_id.clone())
    }

    fn bind(self: &Arc<Self>, requested: &str) -> NativeResult<()> {
        self.ensure_open()?;
        let endpoint = Endpoint::parse(requested)?;
        let ipv6 = self.options.lock().ipv6;

        let result = listener::reserve(&endpoint, ipv6).and_then(|reservation| {
            fabric::register(&reservation.address, self).map(|waiting| (reservation, waiting))
        });
        let (reservation, waiting) = match result {
            Ok(ok) => ok,
            Err(e) => {
                debug!("[ZSOCK] {} bind to {} failed: {}", self.socket_type, requested, e);
                self.emit(SocketEvent::BindFailed {
                    endpoint: requested.to_string(),
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let resolved = reservation.endpoint;
        {
            let mut state = self.state.lock();
            state.bindings.push(Binding {
                requested: requested.to_string(),
                endpoint: resolved.clone(),
                address: reservation.address,
                _listener: reservation.listener,
            });
            state.last_endpoint = Some(resolved.clone());
        }
        debug!("[ZSOCK] {} bound to {}", self.socket_type, resolved);
        self.emit(SocketEvent::Bound(resolved));

        for (connector, endpoint) in waiting {
            link(&connector, self, &endpoint);
        }
        Ok(())
    }

    fn connect(self: &Arc<Self>, requested: &str) -> NativeResult<()> {
        self.ensure_open()?;
        let endpoint = Endpoint::parse(requested)?;
        let ipv6 = self.options.lock().ipv6;
        let address = listener::resolve_connect(&endpoint, ipv6)?;

        self.state.lock().connects.push(Connect {
            endpoint: requested.to_string(),
            address: address.clone(),
        });
        debug!("[ZSOCK] {} connecting to {}", self.socket_type, requested);
        self.attach(requested, &address);
        Ok(())
    }

    /// Link to whoever serves `address`, or wait for them to bind.
    fn attach(self: &Arc<Self>, endpoint: &str, address: &Address) {
        match fabric::lookup_or_park(address, self, endpoint) {
            Some(binder) => link(self, &binder, endpoint),
            None => {
                debug!("[ZSOCK] {} waiting for {} to be bound", self.socket_type, endpoint);
                self.emit(SocketEvent::ConnectDelayed(endpoint.to_string()));
            }
        }
    }

    fn unbind(&self, requested: &str) -> NativeResult<()> {
        self.ensure_open()?;
        Endpoint::parse(requested)?;

        let binding = {
            let mut state = self.state.lock();
            let index = state
                .bindings
                .iter()
                .position(|b| b.endpoint == requested || b.requested == requested)
                .ok_or_else(|| NativeError::new(Errno::NoEnt, format!("{requested} is not bound")))?;
            state.bindings.remove(index)
        };
        fabric::deregister(&binding.address, self.id);
        debug!("[ZSOCK] {} unbound {}", self.socket_type, binding.endpoint);

        let endpoint = binding.endpoint.clone();
        drop(binding);
        for peer in self.take_peers(|p| p.role == Role::Accepted && p.endpoint == endpoint) {
            if let Some(socket) = peer.socket.upgrade() {
                socket.peer_gone(self.id);
            }
            self.emit(SocketEvent::Disconnected(endpoint.clone()));
        }
        Ok(())
    }

    fn disconnect(&self, requested: &str) -> NativeResult<()> {
        self.ensure_open()?;
        Endpoint::parse(requested)?;

        let removed: Vec<Connect> = {
            let mut state = self.state.lock();
            let (removed, kept): (Vec<Connect>, Vec<Connect>) = std::mem::take(&mut state.connects)
                .into_iter()
                .partition(|c| c.endpoint == requested);
            state.connects = kept;
            removed
        };
        if removed.is_empty() {
            return Err(NativeError::new(
                Errno::NoEnt,
                format!("{requested} is not connected"),
            ));
        }

        for connect in &removed {
            fabric::unpark(&connect.address, self.id);
        }
        for peer in self.take_peers(|p| p.role == Role::Connected && p.endpoint == requested) {
            if let Some(socket) = peer.socket.upgrade() {
                socket.peer_gone(self.id);
            }
        }
        debug!("[ZSOCK] {} disconnected from {}", self.socket_type, requested);
        self.emit(SocketEvent::Disconnected(requested.to_string()));
        Ok(())
    }

    /// Drop links to a peer that unbound, disconnected or closed.
    ///
    /// Connects whose binder went away are parked again, so they relink if
    /// the endpoint is bound later.
    fn peer_gone(self: &Arc<Self>, id: u64) {
        let gone = self.take_peers(|p| p.id == id);
        if gone.is_empty() {
            return;
        }
        for peer in &gone {
            trace!("[ZSOCK] {} lost peer on {}", self.socket_type, peer.endpoint);
            self.emit(SocketEvent::Disconnected(peer.endpoint.clone()));
        }
        if self.is_closed() {
            return;
        }

        let relinks: Vec<(String, Address)> = {
            let state = self.state.lock();
            gone.iter()
                .filter(|p| p.role == Role::Connected)
                .filter_map(|p| {
                    state
                        .connects
                        .iter()
                        .find(|c| c.endpoint == p.endpoint)
                        .map(|c| (c.endpoint.clone(), c.address.clone()))
                })
                .collect()
        };
        for (endpoint, address) in relinks {
            self.attach(&endpoint, &address);
        }
    }

    fn send(&self, mut frames: Vec<Bytes>) -> NativeResult<()> {
        self.ensure_open()?;
        if !self.socket_type.can_send() {
            return Err(NativeError::not_supported(format!(
                "{} sockets cannot send",
                self.socket_type
            )));
        }
        if frames.is_empty() {
            return Err(NativeError::invalid("message has no frames"));
        }
        trace!("[ZSOCK] {} sending {} frames", self.socket_type, frames.len());

        match self.socket_type {
            SocketType::Pub | SocketType::XPub => {
                self.fan_out(frames, true);
                Ok(())
            }
            SocketType::XSub => {
                self.apply_subscription_frame(&frames[0]);
                self.fan_out(frames, false);
                Ok(())
            }
            SocketType::Router => self.route(frames),
            SocketType::Rep => self.reply(frames),
            SocketType::Req => {
                if self.state.lock().awaiting_reply {
                    return Err(NativeError::new(
                        Errno::Fsm,
                        "REQ must receive a reply before sending again",
                    ));
                }
                frames.insert(0, Bytes::new());
                self.send_round_robin(frames)?;
                self.state.lock().awaiting_reply = true;
                Ok(())
            }
            _ => self.send_round_robin(frames),
        }
    }

    /// Deliver to every receiving peer.
    ///
    /// PUB and XPUB filter by each subscriber's prefixes before the queue
    /// limit is checked, so unmatched traffic never occupies a subscriber's
    /// queue.
    fn fan_out(&self, frames: Vec<Bytes>, publish: bool) {
        let send_hwm = self.options.lock().send_hwm;
        let targets: Vec<Arc<SocketCore>> = self
            .state
            .lock()
            .peers
            .iter()
            .filter(|p| p.socket_type.can_recv())
            .filter_map(|p| p.socket.upgrade())
            .collect();

        if targets.is_empty() {
            trace!("[ZSOCK] {} has no subscribers, dropping", self.socket_type);
            return;
        }
        let topic = frames.first().map_or(&[][..], |f| &f[..]);
        for peer in targets {
            if publish {
                let (subscribed, recv_hwm) = {
                    let options = peer.options.lock();
                    (options.matches_subscription(topic), options.recv_hwm)
                };
                if !subscribed {
                    trace!(
                        "[ZSOCK] {} peer {} not subscribed, skipping",
                        self.socket_type,
                        peer.id
                    );
                    continue;
                }
                let hwm = queue_limit(send_hwm, recv_hwm);
                if hwm > 0 && peer.inbox_tx.len() >= hwm {
                    trace!("[ZSOCK] {} peer {} at HWM, dropping", self.socket_type, peer.id);
                    continue;
                }
            }
            peer.deliver(self.id, frames.clone());
        }
    }

    /// XSUB subscriptions travel as messages: `0x01 prefix` or `0x00 prefix`.
    fn apply_subscription_frame(&self, frame: &Bytes) {
        match frame.first() {
            Some(1) => self.options.lock().subscribe(frame.slice(1..)),
            Some(0) => self.options.lock().unsubscribe(&frame[1..]),
            _ => {}
        }
    }

    fn route(&self, mut frames: Vec<Bytes>) -> NativeResult<()> {
        if frames.len() < 2 {
            return Err(NativeError::invalid(
                "ROUTER message needs a routing id and a body",
            ));
        }
        let id = frames.remove(0);
        let target = self
            .state
            .lock()
            .peers
            .iter()
            .find(|p| p.routing_id == id)
            .and_then(|p| p.socket.upgrade());

        match target {
            Some(peer) => {
                peer.deliver(self.id, frames);
                Ok(())
            }
            None if self.options.lock().router_mandatory => Err(NativeError::new(
                Errno::HostUnreach,
                format!("no peer with routing id {id:?}"),
            )),
            None => {
                trace!("[ZSOCK] ROUTER unknown routing id {:?}, dropping", id);
                Ok(())
            }
        }
    }

    fn reply(&self, frames: Vec<Bytes>) -> NativeResult<()> {
        let (requester, mut envelope) = self.state.lock().reply_to.take().ok_or_else(|| {
            NativeError::new(Errno::Fsm, "REP must receive a request before replying")
        })?;
        envelope.extend(frames);
        match self.peer_socket(requester) {
            Some(peer) => peer.deliver(self.id, envelope),
            None => trace!("[ZSOCK] REP requester {} gone, dropping reply", requester),
        }
        Ok(())
    }

    fn send_round_robin(&self, frames: Vec<Bytes>) -> NativeResult<()> {
        let deadline = self
            .options
            .lock()
            .send_timeout
            .map(|timeout| Instant::now() + timeout);

        let mut state = self.state.lock();
        loop {
            if self.is_closed() {
                return Err(NativeError::terminated());
            }

            state.peers.retain(|p| p.socket.strong_count() > 0);
            let count = state.peers.len();
            let mut target = None;
            for _ in 0..count {
                let index = state.cursor % count;
                state.cursor = index + 1;
                let peer = &state.peers[index];
                if peer.socket_type.can_recv() {
                    target = peer.socket.upgrade();
                    if target.is_some() {
                        break;
                    }
                }
            }

            if let Some(peer) = target {
                drop(state);
                peer.deliver(self.id, frames);
                return Ok(());
            }

            match deadline {
                None => self.peer_ready.wait(&mut state),
                Some(deadline) => {
                    if self.peer_ready.wait_until(&mut state, deadline).timed_out() {
                        return Err(NativeError::again("no peer available before send timeout"));
                    }
                }
            }
        }
    }

    fn recv(&self) -> NativeResult<Vec<Bytes>> {
        self.ensure_open()?;
        if !self.socket_type.can_recv() {
            return Err(NativeError::not_supported(format!(
                "{} sockets cannot receive",
                self.socket_type
            )));
        }
        {
            let state = self.state.lock();
            if self.socket_type == SocketType::Req && !state.awaiting_reply {
                return Err(NativeError::new(
                    Errno::Fsm,
                    "REQ must send a request before receiving",
                ));
            }
            if self.socket_type == SocketType::Rep && state.reply_to.is_some() {
                return Err(NativeError::new(
                    Errno::Fsm,
                    "REP must reply before receiving the next request",
                ));
            }
        }

        let timeout = self.options.lock().recv_timeout;
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let delivery = match deadline {
                None => self
                    .inbox_rx
                    .recv()
                    .map_err(|_| NativeError::terminated())?,
                Some(_) if timeout.is_some_and(|t| t.is_zero()) => {
                    match self.inbox_rx.try_recv() {
                        Ok(delivery) => delivery,
                        Err(TryRecvError::Empty) => {
                            return Err(NativeError::again("no message available"))
                        }
                        Err(TryRecvError::Disconnected) => return Err(NativeError::terminated()),
                    }
                }
                Some(deadline) => match self.inbox_rx.recv_deadline(deadline) {
                    Ok(delivery) => delivery,
                    Err(RecvTimeoutError::Timeout) => {
                        return Err(NativeError::again("no message before receive timeout"))
                    }
                    Err(RecvTimeoutError::Disconnected) => return Err(NativeError::terminated()),
                },
            };

            let (from, mut frames) = match delivery {
                Delivery::Message { from, frames } => (from, frames),
                Delivery::Closed => {
                    // Leave the sentinel for any other blocked receiver
                    let _ = self.inbox_tx.send(Delivery::Closed);
                    return Err(NativeError::terminated());
                }
            };

            let frames = match self.socket_type {
                SocketType::Sub | SocketType::XSub => {
                    let topic = frames.first().map_or(&[][..], |f| &f[..]);
                    if !self.options.lock().matches_subscription(topic) {
                        trace!("[ZSOCK] {} filtered message", self.socket_type);
                        continue;
                    }
                    frames
                }
                SocketType::Router => {
                    frames.insert(0, self.routing_id_of(from));
                    frames
                }
                SocketType::Rep => {
                    let Some(delimiter) = frames.iter().position(Bytes::is_empty) else {
                        trace!("[ZSOCK] REP dropping request without envelope delimiter");
                        continue;
                    };
                    let body = frames.split_off(delimiter + 1);
                    self.state.lock().reply_to = Some((from, frames));
                    body
                }
                SocketType::Req => {
                    if frames.first().is_some_and(Bytes::is_empty) {
                        frames.remove(0);
                    }
                    self.state.lock().awaiting_reply = false;
                    frames
                }
                _ => frames,
            };

            trace!("[ZSOCK] {} received {} frames", self.socket_type, frames.len());
            return Ok(frames);
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let (bindings, connects, peers) = {
            let mut state = self.state.lock();
            (
                std::mem::take(&mut state.bindings),
                std::mem::take(&mut state.connects),
                std::mem::take(&mut state.peers),
            )
        };
        for binding in &bindings {
            fabric::deregister(&binding.address, self.id);
        }
        // Releases the listeners
        drop(bindings);
        for connect in &connects {
            fabric::unpark(&connect.address, self.id);
        }
        for peer in peers {
            if let Some(socket) = peer.socket.upgrade() {
                socket.peer_gone(self.id);
            }
        }

        let _ = self.inbox_tx.send(Delivery::Closed);
        self.peer_ready.notify_all();
        debug!("[ZSOCK] {} socket closed", self.socket_type);
        self.emit(SocketEvent::Closed);
    }
}

/// Security handshake outcome between two option sets.
///
/// Only the mechanism negotiation is modelled: both sides must use the same
/// mechanism, exactly one side must be the server, and a CURVE client must
/// hold the server's public key.
fn check_security(a: &SocketOptions, b: &SocketOptions) -> Result<(), String> {
    if a.mechanism != b.mechanism {
        return Err(format!(
            "mechanism mismatch: {} vs {}",
            a.mechanism, b.mechanism
        ));
    }
    match a.mechanism {
        Mechanism::Null => Ok(()),
        Mechanism::Curve => {
            let (server, client) = match (a.curve_server, b.curve_server) {
                (true, false) => (a, b),
                (false, true) => (b, a),
                _ => return Err("CURVE needs exactly one server".to_string()),
            };
            let server_key = server
                .curve_publickey
                .ok_or_else(|| "CURVE server has no public key".to_string())?;
            if server.curve_secretkey.is_none() {
                return Err("CURVE server has no secret key".to_string());
            }
            if client.curve_secretkey.is_none() {
                return Err("CURVE client has no secret key".to_string());
            }
            if client.curve_serverkey != Some(server_key) {
                return Err("CURVE server key mismatch".to_string());
            }
            Ok(())
        }
        Mechanism::Plain => match (a.plain_server, b.plain_server) {
            (true, false) | (false, true) => Ok(()),
            _ => Err("PLAIN needs exactly one server".to_string()),
        },
        Mechanism::Gssapi => Err("GSSAPI is not supported".to_string()),
    }
}

fn admit(
    connector: &Arc<SocketCore>,
    connector_options: &SocketOptions,
    binder: &Arc<SocketCore>,
    binder_options: &SocketOptions,
) -> Result<(), String> {
    if Arc::ptr_eq(connector, binder) {
        return Err("socket cannot connect to itself".to_string());
    }
    if connector.is_closed() || binder.is_closed() {
        return Err("peer is closed".to_string());
    }
    if !connector.socket_type.is_compatible(binder.socket_type) {
        return Err(format!(
            "{} cannot talk to {}",
            connector.socket_type, binder.socket_type
        ));
    }
    for side in [connector, binder] {
        if side.socket_type == SocketType::Pair && side.peer_count() > 0 {
            return Err("PAIR socket already has a peer".to_string());
        }
    }
    check_security(connector_options, binder_options)
}

/// Link a connecting socket to the socket bound at its endpoint.
fn link(connector: &Arc<SocketCore>, binder: &Arc<SocketCore>, endpoint: &str) {
    let connector_options = connector.options.lock().clone();
    let binder_options = binder.options.lock().clone();

    if let Err(reason) = admit(connector, &connector_options, binder, &binder_options) {
        debug!(
            "[ZSOCK] {} -> {} refused on {}: {}",
            connector.socket_type, binder.socket_type, endpoint, reason
        );
        let event = SocketEvent::HandshakeFailed {
            endpoint: endpoint.to_string(),
            reason,
        };
        binder.emit(event.clone());
        connector.emit(event);
        return;
    }

    let bound_endpoint = {
        let wanted = connector
            .state
            .lock()
            .connects
            .iter()
            .find(|c| c.endpoint == endpoint)
            .map(|c| c.address.clone());
        let state = binder.state.lock();
        wanted
            .and_then(|wanted| {
                state
                    .bindings
                    .iter()
                    .find(|b| fabric::serves(&b.address, &wanted))
                    .map(|b| b.endpoint.clone())
            })
            .unwrap_or_else(|| endpoint.to_string())
    };

    connector.add_peer(Peer {
        id: binder.id,
        socket: Arc::downgrade(binder),
        socket_type: binder.socket_type,
        routing_id: routing_id_for(&binder_options, binder.id),
        endpoint: endpoint.to_string(),
        role: Role::Connected,
    });
    binder.add_peer(Peer {
        id: connector.id,
        socket: Arc::downgrade(connector),
        socket_type: connector.socket_type,
        routing_id: routing_id_for(&connector_options, connector.id),
        endpoint: bound_endpoint.clone(),
        role: Role::Accepted,
    });

    debug!(
        "[ZSOCK] {} linked to {} on {}",
        connector.socket_type, binder.socket_type, endpoint
    );
    connector.emit(SocketEvent::Connected(endpoint.to_string()));
    binder.emit(SocketEvent::Accepted(bound_endpoint));
}

/// Native socket handle.
///
/// Dropping the handle closes the socket.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use zsock_core::socket_type::SocketType;
/// use zsock_native::{Zsock, ZsockDelegate};
///
/// let server = Zsock::new(SocketType::Pair);
/// server.bind(format_args!("{}", "inproc://doc-zsock")).unwrap();
///
/// let client = Zsock::new(SocketType::Pair);
/// client.connect(format_args!("{}", "inproc://doc-zsock")).unwrap();
///
/// client.send(vec![Bytes::from_static(b"ping")]).unwrap();
/// assert_eq!(server.recv().unwrap(), vec![Bytes::from_static(b"ping")]);
/// ```
pub struct Zsock {
    core: Arc<SocketCore>,
}

impl Zsock {
    /// Create a socket with default options.
    pub fn new(socket_type: SocketType) -> Self {
        Self::with_options(socket_type, SocketOptions::default())
    }

    /// Create a socket with the given options.
    pub fn with_options(socket_type: SocketType, options: SocketOptions) -> Self {
        let core = SocketCore::new(socket_type, options);
        trace!("[ZSOCK] Created {} socket #{}", socket_type, core.id);
        Self { core }
    }

    /// Process-unique socket id.
    pub fn id(&self) -> u64 {
        self.core.id
    }
}

impl fmt::Debug for Zsock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zsock")
            .field("id", &self.core.id)
            .field("socket_type", &self.core.socket_type)
            .field("closed", &self.core.is_closed())
            .finish()
    }
}

impl ZsockDelegate for Zsock {
    fn socket_type(&self) -> SocketType {
        self.core.socket_type
    }

    fn bind(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.core.bind(&format_endpoint(endpoint))
    }

    fn connect(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.core.connect(&format_endpoint(endpoint))
    }

    fn unbind(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.core.unbind(&format_endpoint(endpoint))
    }

    fn disconnect(&self, endpoint: fmt::Arguments<'_>) -> NativeResult<()> {
        self.core.disconnect(&format_endpoint(endpoint))
    }

    fn last_endpoint(&self) -> Option<String> {
        self.core.state.lock().last_endpoint.clone()
    }

    fn send(&self, frames: Vec<Bytes>) -> NativeResult<()> {
        self.core.send(frames)
    }

    fn recv(&self) -> NativeResult<Vec<Bytes>> {
        self.core.recv()
    }

    fn options(&self) -> MutexGuard<'_, SocketOptions> {
        self.core.options.lock()
    }

    fn monitor(&self) -> SocketMonitor {
        let (sender, monitor) = create_monitor();
        *self.core.monitor.lock() = Some(sender);
        monitor
    }

    fn destroy(&self) {
        self.core.close();
    }

    fn is_destroyed(&self) -> bool {
        self.core.is_closed()
    }
}

impl Drop for Zsock {
    fn drop(&mut self) {
        self.core.close();
    }
}
