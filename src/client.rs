use std::collections::HashMap;

/// Opaque per-connection identity, stable for the connection's lifetime.
///
/// Backed by the `mio::Token` the reactor already assigns to the socket, so
/// no separate id allocator is needed.
pub type Handle = usize;

/// Per-connection state tracked independently of the socket itself.
#[derive(Debug, Default)]
pub struct ClientInfo {
    pub nickname: String,
    pub username: String,
    pub authenticated: bool,
    pub password_prompt_sent: bool,
    pub rx_buffer: Vec<u8>,
}

impl ClientInfo {
    fn new() -> Self {
        Self::default()
    }
}

/// The handle → `ClientInfo` mapping plus nickname resolution.
///
/// Nickname lookup is a linear scan, which is acceptable at the scale this
/// relay targets and avoids keeping a second index in sync with renames.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<Handle, ClientInfo>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: Handle) {
        self.clients.insert(handle, ClientInfo::new());
    }

    pub fn get(&self, handle: Handle) -> Option<&ClientInfo> {
        self.clients.get(&handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut ClientInfo> {
        self.clients.get_mut(&handle)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<ClientInfo> {
        self.clients.remove(&handle)
    }

    /// Resolves a nickname to its owning handle. Last writer wins if two
    /// clients ever share a nickname — nothing here rejects the duplicate
    /// (see DESIGN.md).
    pub fn find_by_nick(&self, nickname: &str) -> Option<Handle> {
        self.clients
            .iter()
            .find(|(_, info)| info.nickname == nickname)
            .map(|(handle, _)| *handle)
    }
}
