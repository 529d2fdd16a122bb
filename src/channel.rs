use std::collections::{HashMap, HashSet};

use crate::client::Handle;

/// Result of evaluating JOIN policy against an existing channel.
#[derive(Debug, PartialEq, Eq)]
pub enum JoinRejection {
    InviteOnly,
    WrongKey,
    LimitReached,
}

/// One channel: its topic, membership, operator set, and mode state.
///
/// `members` is insertion-ordered (a `Vec`, not a `HashSet`) because PRIVMSG
/// fan-out must walk it in join order (see invariant 4 in SPEC_FULL.md).
#[derive(Debug)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub members: Vec<Handle>,
    pub operators: HashSet<Handle>,
    pub modes: HashSet<char>,
    pub key: Option<String>,
    pub user_limit: u32,
    pub invitees: HashSet<Handle>,
}

impl Channel {
    fn new(name: String) -> Self {
        Self {
            name,
            topic: String::new(),
            members: Vec::new(),
            operators: HashSet::new(),
            modes: HashSet::new(),
            key: None,
            user_limit: 0,
            invitees: HashSet::new(),
        }
    }

    pub fn is_member(&self, handle: Handle) -> bool {
        self.members.contains(&handle)
    }

    pub fn is_operator(&self, handle: Handle) -> bool {
        self.operators.contains(&handle)
    }

    /// Evaluates JOIN policy (§4.3) against an existing channel. Does not
    /// mutate anything; the caller admits on `Ok`.
    pub fn check_join(&self, handle: Handle, key: Option<&str>) -> Result<(), JoinRejection> {
        if self.modes.contains(&'i') && !self.invitees.contains(&handle) {
            return Err(JoinRejection::InviteOnly);
        }
        if self.modes.contains(&'k') && key != self.key.as_deref() {
            return Err(JoinRejection::WrongKey);
        }
        if self.modes.contains(&'l') && self.members.len() as u32 >= self.user_limit {
            return Err(JoinRejection::LimitReached);
        }
        Ok(())
    }

    /// Admits `handle` unconditionally: append to `members`, consume any
    /// outstanding invite. Callers are expected to have run `check_join`
    /// first for an existing channel.
    pub fn admit(&mut self, handle: Handle) {
        if !self.members.contains(&handle) {
            self.members.push(handle);
        }
        self.invitees.remove(&handle);
    }

    /// Removes `handle` from every membership-related set. Used for both
    /// KICK (members only, per §9) and full departure / disconnect.
    pub fn remove_member(&mut self, handle: Handle) {
        self.members.retain(|h| *h != handle);
    }

    pub fn remove_operator(&mut self, handle: Handle) {
        self.operators.remove(&handle);
    }

    /// Full cleanup on disconnect: members, operators, and invitees (§9).
    pub fn purge(&mut self, handle: Handle) {
        self.remove_member(handle);
        self.remove_operator(handle);
        self.invitees.remove(&handle);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Channel-name → `Channel`. Creates on first JOIN of an unknown name;
/// empty channels are retained rather than garbage-collected (see
/// DESIGN.md) so a topic or mode set while the room is momentarily empty
/// survives until someone rejoins.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Creates `name` if absent, making `creator` its first member and
    /// operator with no mode checks applied (§4.3). Returns `true` if the
    /// channel was newly created.
    pub fn get_or_create(&mut self, name: &str, creator: Handle) -> bool {
        if self.channels.contains_key(name) {
            return false;
        }
        let mut channel = Channel::new(name.to_string());
        channel.members.push(creator);
        channel.operators.insert(creator);
        self.channels.insert(name.to_string(), channel);
        true
    }

    /// Removes `handle` from every channel's members/operators/invitees.
    /// Called once per disconnect (invariant 2 in SPEC_FULL.md).
    pub fn purge_handle(&mut self, handle: Handle) {
        for channel in self.channels.values_mut() {
            channel.purge(handle);
        }
    }
}
