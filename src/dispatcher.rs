//! Verb matching (§4.2): splits a line's verb from its arguments and routes
//! to the handler that owns that verb's parsing and policy.

use crate::client::Handle;
use crate::handlers::{channels, messages, registration};
use crate::parsers::{split_first_arg, split_verb, tokens};
use crate::replies::Reply;
use crate::state::{Outbox, State};

/// Dispatches one complete, non-empty line from an authenticated client.
pub fn dispatch(state: &mut State, handle: Handle, line: &str, out: &mut Outbox) {
    let (verb, args) = split_verb(line);
    match verb {
        "NICK" => {
            let nickname = tokens(args).first().copied().unwrap_or("");
            registration::handle_nick(state, handle, nickname, out);
        }
        "USER" => {
            let username = tokens(args).first().copied().unwrap_or("");
            registration::handle_user(state, handle, username, out);
        }
        "JOIN" => {
            let parts = tokens(args);
            let channel = parts.first().copied().unwrap_or("");
            let key = parts.get(1).copied();
            channels::handle_join(state, handle, channel, key, out);
        }
        "PRIVMSG" => {
            let Some((target, message)) = split_first_arg(args) else {
                out.send(handle, Reply::UnknownCommand.text());
                return;
            };
            messages::handle_privmsg(state, handle, target, message, out);
        }
        "KICK" => {
            let parts = tokens(args);
            let channel = parts.first().copied().unwrap_or("");
            let target = parts.get(1).copied().unwrap_or("");
            channels::handle_kick(state, handle, channel, target, out);
        }
        "MODE" => {
            let parts = tokens(args);
            let channel = parts.first().copied().unwrap_or("");
            let mode = parts.get(1).copied().unwrap_or("");
            let param = parts.get(2).copied();
            channels::handle_mode(state, handle, channel, mode, param, out);
        }
        "INVITE" => {
            let parts = tokens(args);
            let target = parts.first().copied().unwrap_or("");
            let channel = parts.get(1).copied().unwrap_or("");
            channels::handle_invite(state, handle, target, channel, out);
        }
        "TOPIC" => {
            let Some((channel, topic)) = split_first_arg(args) else {
                out.send(handle, Reply::UnknownCommand.text());
                return;
            };
            let topic = (!topic.is_empty()).then_some(topic);
            channels::handle_topic(state, handle, channel, topic, out);
        }
        _ => out.send(handle, Reply::UnknownCommand.text()),
    }
}
