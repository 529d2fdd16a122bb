use crate::channel::ChannelRegistry;
use crate::client::{ClientRegistry, Handle};

/// The registries a command handler is allowed to mutate. Deliberately
/// free of any socket or reactor knowledge so dispatch logic can be unit
/// tested without a network.
#[derive(Debug, Default)]
pub struct State {
    pub clients: ClientRegistry,
    pub channels: ChannelRegistry,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full disconnect cleanup for `handle`: drops its `ClientInfo` and
    /// purges it from every channel's members/operators/invitees
    /// (invariant 2 in SPEC_FULL.md).
    pub fn disconnect(&mut self, handle: Handle) {
        self.clients.remove(handle);
        self.channels.purge_handle(handle);
    }
}

/// Replies queued by a handler, to be flushed to sockets by the reactor.
/// Handlers never write to a socket directly — that keeps dispatch pure and
/// lets PRIVMSG fan-out queue several recipients from one call.
#[derive(Debug, Default)]
pub struct Outbox {
    messages: Vec<(Handle, String)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, handle: Handle, line: impl Into<String>) {
        self.messages.push((handle, line.into()));
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, (Handle, String)> {
        self.messages.drain(..)
    }
}

#[cfg(test)]
impl Outbox {
    pub fn sent_to(&self, handle: Handle) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}
