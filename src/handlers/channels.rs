use log::info;

use crate::channel::JoinRejection;
use crate::client::Handle;
use crate::replies::Reply;
use crate::state::{Outbox, State};

pub fn handle_join(
    state: &mut State,
    handle: Handle,
    channel_name: &str,
    key: Option<&str>,
    out: &mut Outbox,
) {
    if state.channels.get_mut(channel_name).is_none() {
        state.channels.get_or_create(channel_name, handle);
        info!("Channel created: {channel_name}");
        out.send(
            handle,
            Reply::JoinedChannel {
                channel: channel_name,
            }
            .text(),
        );
        return;
    }

    let channel = state.channels.get_mut(channel_name).unwrap();
    match channel.check_join(handle, key) {
        Err(JoinRejection::InviteOnly) => out.send(handle, Reply::CannotJoinInviteOnly.text()),
        Err(JoinRejection::WrongKey) => out.send(handle, Reply::CannotJoinWrongKey.text()),
        Err(JoinRejection::LimitReached) => {
            out.send(handle, Reply::CannotJoinLimitReached.text())
        }
        Ok(()) => {
            channel.admit(handle);
            out.send(
                handle,
                Reply::JoinedChannel {
                    channel: channel_name,
                }
                .text(),
            );
        }
    }
}

pub fn handle_kick(
    state: &mut State,
    handle: Handle,
    channel_name: &str,
    target_nick: &str,
    out: &mut Outbox,
) {
    let Some(channel) = state.channels.get_mut(channel_name) else {
        out.send(
            handle,
            Reply::NoSuchChannel {
                channel: channel_name,
            }
            .text(),
        );
        return;
    };
    if !channel.is_operator(handle) {
        out.send(
            handle,
            Reply::NotOperator {
                channel: channel_name,
            }
            .text(),
        );
        return;
    }
    let Some(target) = state.clients.find_by_nick(target_nick) else {
        out.send(
            handle,
            Reply::NoSuchUserOrChannel {
                target: target_nick,
            }
            .text(),
        );
        return;
    };
    let channel = state.channels.get_mut(channel_name).unwrap();
    channel.remove_member(target);
    let reply = Reply::Kicked {
        nick: target_nick,
        channel: channel_name,
    }
    .text();
    out.send(handle, reply.clone());
    out.send(target, reply);
}

pub fn handle_invite(
    state: &mut State,
    handle: Handle,
    target_nick: &str,
    channel_name: &str,
    out: &mut Outbox,
) {
    let Some(channel) = state.channels.get_mut(channel_name) else {
        out.send(
            handle,
            Reply::NoSuchChannel {
                channel: channel_name,
            }
            .text(),
        );
        return;
    };
    if !channel.is_operator(handle) {
        out.send(
            handle,
            Reply::NotOperator {
                channel: channel_name,
            }
            .text(),
        );
        return;
    }
    let Some(target) = state.clients.find_by_nick(target_nick) else {
        out.send(
            handle,
            Reply::NoSuchUserOrChannel {
                target: target_nick,
            }
            .text(),
        );
        return;
    };
    state
        .channels
        .get_mut(channel_name)
        .unwrap()
        .invitees
        .insert(target);
    let reply = Reply::Invited {
        nick: target_nick,
        channel: channel_name,
    }
    .text();
    out.send(handle, reply.clone());
    out.send(target, reply);
}

pub fn handle_topic(
    state: &mut State,
    handle: Handle,
    channel_name: &str,
    new_topic: Option<&str>,
    out: &mut Outbox,
) {
    let Some(channel) = state.channels.get_mut(channel_name) else {
        out.send(
            handle,
            Reply::NoSuchChannel {
                channel: channel_name,
            }
            .text(),
        );
        return;
    };

    match new_topic.filter(|t| !t.is_empty()) {
        None => out.send(
            handle,
            Reply::TopicIs {
                channel: channel_name,
                topic: &channel.topic,
            }
            .text(),
        ),
        Some(topic) => {
            if channel.modes.contains(&'t') && !channel.is_operator(handle) {
                out.send(handle, Reply::TopicRestricted.text());
                return;
            }
            channel.topic = topic.to_string();
            out.send(
                handle,
                Reply::TopicSet {
                    channel: channel_name,
                    topic,
                }
                .text(),
            );
        }
    }
}

/// Mutates a channel's mode flags and associated data (§4.3). The invoker
/// must already be an operator of `channel_name`; that is checked before
/// any part of `mode_arg` is parsed.
pub fn handle_mode(
    state: &mut State,
    handle: Handle,
    channel_name: &str,
    mode_arg: &str,
    param: Option<&str>,
    out: &mut Outbox,
) {
    let Some(channel) = state.channels.get_mut(channel_name) else {
        out.send(
            handle,
            Reply::NoSuchChannel {
                channel: channel_name,
            }
            .text(),
        );
        return;
    };
    if !channel.is_operator(handle) {
        out.send(
            handle,
            Reply::NotOperator {
                channel: channel_name,
            }
            .text(),
        );
        return;
    }

    let mut chars = mode_arg.chars();
    let (sign, flag) = (chars.next(), chars.next());
    if let (Some(sign @ ('+' | '-')), Some(flag)) = (sign, flag) {
        if sign == '+' {
            match flag {
                'k' => {
                    let Some(key) = param.filter(|p| !p.is_empty()) else {
                        out.send(handle, Reply::ModeKeyRequiresParam.text());
                        return;
                    };
                    channel.modes.insert('k');
                    channel.key = Some(key.to_string());
                }
                'l' => {
                    let Some(param) = param.filter(|p| !p.is_empty()) else {
                        out.send(handle, Reply::ModeLimitRequiresParam.text());
                        return;
                    };
                    let Ok(limit) = param.parse::<u32>() else {
                        out.send(handle, Reply::ModeLimitRequiresParam.text());
                        return;
                    };
                    if limit == 0 {
                        out.send(handle, Reply::ModeLimitMustBePositive.text());
                        return;
                    }
                    channel.modes.insert('l');
                    channel.user_limit = limit;
                }
                'o' => {
                    let Some(nick) = param.filter(|p| !p.is_empty()) else {
                        out.send(handle, Reply::ModeOperatorRequiresNick.text());
                        return;
                    };
                    let Some(target) = state.clients.find_by_nick(nick) else {
                        out.send(handle, Reply::NoSuchUserOrChannel { target: nick }.text());
                        return;
                    };
                    let channel = state.channels.get_mut(channel_name).unwrap();
                    if !channel.is_member(target) {
                        out.send(
                            handle,
                            Reply::UserNotInChannel {
                                nick,
                                channel: channel_name,
                            }
                            .text(),
                        );
                        return;
                    }
                    channel.operators.insert(target);
                }
                other => {
                    channel.modes.insert(other);
                }
            }
        } else {
            match flag {
                'k' => {
                    channel.modes.remove(&'k');
                    channel.key = None;
                }
                'l' => {
                    channel.modes.remove(&'l');
                    channel.user_limit = 0;
                }
                'o' => {
                    let Some(nick) = param.filter(|p| !p.is_empty()) else {
                        out.send(handle, Reply::ModeOperatorRequiresNick.text());
                        return;
                    };
                    let Some(target) = state.clients.find_by_nick(nick) else {
                        out.send(handle, Reply::NoSuchUserOrChannel { target: nick }.text());
                        return;
                    };
                    state
                        .channels
                        .get_mut(channel_name)
                        .unwrap()
                        .remove_operator(target);
                }
                other => {
                    channel.modes.remove(&other);
                }
            }
        }
    }

    out.send(
        handle,
        Reply::ModeChanged {
            channel: channel_name,
            mode: mode_arg,
        }
        .text(),
    );
}
