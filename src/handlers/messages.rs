use crate::client::Handle;
use crate::replies::Reply;
use crate::state::{Outbox, State};

/// `PRIVMSG <target> <message…>` (§4.3). `target` is a channel name if it
/// resolves as one in the Channel Registry, otherwise a nickname.
pub fn handle_privmsg(state: &mut State, handle: Handle, target: &str, message: &str, out: &mut Outbox) {
    if let Some(channel) = state.channels.get(target) {
        if !channel.is_member(handle) {
            out.send(handle, Reply::NotInChannel { channel: target }.text());
            return;
        }
        if channel.modes.contains(&'m') && !channel.is_operator(handle) {
            out.send(handle, Reply::ChannelModerated.text());
            return;
        }
        let from_nick = state
            .clients
            .get(handle)
            .map(|info| info.nickname.clone())
            .unwrap_or_default();
        let reply = Reply::PrivMsg {
            from_nick: &from_nick,
            message,
        }
        .text();
        for &member in &channel.members {
            if member != handle {
                out.send(member, reply.clone());
            }
        }
        return;
    }

    match state.clients.find_by_nick(target) {
        Some(recipient) => {
            let from_nick = state
                .clients
                .get(handle)
                .map(|info| info.nickname.clone())
                .unwrap_or_default();
            out.send(
                recipient,
                Reply::PrivMsg {
                    from_nick: &from_nick,
                    message,
                }
                .text(),
            );
        }
        None => out.send(handle, Reply::NoSuchUserOrChannel { target }.text()),
    }
}
