//! Transport doubles used only by the protocol-core unit tests in this
//! crate (no real sockets, no timing flakiness).

#![cfg(test)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::err::{Error, Result};
use crate::net::Transport;

/// A multi-peer in-memory network. Each registered address gets its own
/// inbox; `send` looks up the destination's inbox and pushes into it,
/// mirroring real UDP demultiplexing by destination address.
#[derive(Clone, Default)]
pub struct Network {
    inboxes: Arc<Mutex<HashMap<SocketAddr, Sender<(Vec<u8>, SocketAddr)>>>>,
}

pub struct NetworkEndpoint {
    local: SocketAddr,
    inboxes: Arc<Mutex<HashMap<SocketAddr, Sender<(Vec<u8>, SocketAddr)>>>>,
    rx: Receiver<(Vec<u8>, SocketAddr)>,
}

impl Network {
    pub fn new() -> Self {
        Network::default()
    }

    pub fn endpoint(&self, addr: SocketAddr) -> NetworkEndpoint {
        let (tx, rx) = mpsc::channel();
        self.inboxes.lock().unwrap().insert(addr, tx);
        NetworkEndpoint {
            local: addr,
            inboxes: self.inboxes.clone(),
            rx,
        }
    }
}

impl Transport for NetworkEndpoint {
    fn send(&self, bytes: &[u8], addr: SocketAddr) -> Result<()> {
        let inboxes = self.inboxes.lock().unwrap();
        if let Some(tx) = inboxes.get(&addr) {
            let _ = tx.send((bytes.to_vec(), self.local));
        }
        Ok(())
    }

    fn recv(&self) -> Result<(Vec<u8>, SocketAddr)> {
        self.rx
            .recv_timeout(Duration::from_secs(2))
            .map_err(|_| Error::Timeout)
    }
}

/// A single scripted inbox, driven step by step by the test: `push_timeout`
/// queues a `Timeout` result, `push_datagram` queues a delivered datagram.
/// `sent()` exposes every `send()` call for assertion. Deterministic:
/// nothing here is wall-clock dependent.
#[derive(Default)]
pub struct ScriptedTransport {
    inbound: Mutex<VecDeque<Result<(Vec<u8>, SocketAddr)>>>,
    sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        ScriptedTransport::default()
    }

    pub fn push_datagram(&self, bytes: Vec<u8>, from: SocketAddr) {
        self.inbound.lock().unwrap().push_back(Ok((bytes, from)));
    }

    pub fn push_timeout(&self) {
        self.inbound.lock().unwrap().push_back(Err(Error::Timeout));
    }

    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, bytes: &[u8], addr: SocketAddr) -> Result<()> {
        self.sent.lock().unwrap().push((bytes.to_vec(), addr));
        Ok(())
    }

    fn recv(&self) -> Result<(Vec<u8>, SocketAddr)> {
        self.inbound
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(Error::Timeout))
    }
}
