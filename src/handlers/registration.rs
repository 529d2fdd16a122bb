use crate::client::Handle;
use crate::replies::Reply;
use crate::state::{Outbox, State};

pub fn handle_nick(state: &mut State, handle: Handle, nickname: &str, out: &mut Outbox) {
    let Some(info) = state.clients.get_mut(handle) else {
        return;
    };
    info.nickname = nickname.to_string();
    out.send(handle, Reply::NicknameSet { nick: nickname }.text());
}

pub fn handle_user(state: &mut State, handle: Handle, username: &str, out: &mut Outbox) {
    let Some(info) = state.clients.get_mut(handle) else {
        return;
    };
    info.username = username.to_string();
    out.send(handle, Reply::UsernameSet { user: username }.text());
}
