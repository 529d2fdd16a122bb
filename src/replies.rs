//! Human-readable, single-line reply bodies (§6). The reactor appends the
//! trailing `\n` when it writes a reply to a socket, so every variant here
//! renders without one.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<'a> {
    PasswordPrompt,
    PasswordAccepted,
    PasswordRejected,

    NicknameSet { nick: &'a str },
    UsernameSet { user: &'a str },

    JoinedChannel { channel: &'a str },
    CannotJoinInviteOnly,
    CannotJoinWrongKey,
    CannotJoinLimitReached,

    NoSuchChannel { channel: &'a str },
    NoSuchUserOrChannel { target: &'a str },
    NotOperator { channel: &'a str },
    NotInChannel { channel: &'a str },
    ChannelModerated,

    PrivMsg { from_nick: &'a str, message: &'a str },

    TopicIs { channel: &'a str, topic: &'a str },
    TopicSet { channel: &'a str, topic: &'a str },
    TopicRestricted,

    ModeChanged { channel: &'a str, mode: &'a str },
    ModeKeyRequiresParam,
    ModeLimitRequiresParam,
    ModeLimitMustBePositive,
    ModeOperatorRequiresNick,
    UserNotInChannel { nick: &'a str, channel: &'a str },

    Invited { nick: &'a str, channel: &'a str },
    Kicked { nick: &'a str, channel: &'a str },

    UnknownCommand,
}

impl<'a> Reply<'a> {
    pub fn text(&self) -> String {
        match self {
            Reply::PasswordPrompt => "Enter server password: ".to_string(),
            Reply::PasswordAccepted => "Password accepted. Welcome!".to_string(),
            Reply::PasswordRejected => "Incorrect password. Connection closed.".to_string(),

            Reply::NicknameSet { nick } => format!("Nickname set to {nick}"),
            Reply::UsernameSet { user } => format!("Username set to {user}"),

            Reply::JoinedChannel { channel } => format!("Joined channel {channel}"),
            Reply::CannotJoinInviteOnly => "Cannot join channel (+i)".to_string(),
            Reply::CannotJoinWrongKey => "Cannot join channel (wrong password)".to_string(),
            Reply::CannotJoinLimitReached => {
                "Cannot join channel (+l): user limit reached".to_string()
            }

            Reply::NoSuchChannel { channel } => format!("No such channel: {channel}"),
            Reply::NoSuchUserOrChannel { target } => {
                format!("No such user or channel: {target}")
            }
            Reply::NotOperator { channel } => {
                format!("You are not an operator of channel: {channel}")
            }
            Reply::NotInChannel { channel } => format!("You are not in channel: {channel}"),
            Reply::ChannelModerated => {
                "Channel is moderated. Only operators can send messages.".to_string()
            }

            Reply::PrivMsg { from_nick, message } => format!("{from_nick}: {message}"),

            Reply::TopicIs { channel, topic } => format!("Topic of {channel}: {topic}"),
            Reply::TopicSet { channel, topic } => {
                format!("Topic for {channel} is set to: {topic}")
            }
            Reply::TopicRestricted => "Topic change is restricted (+t).".to_string(),

            Reply::ModeChanged { channel, mode } => {
                format!("Channel mode for {channel} changed to {mode}")
            }
            Reply::ModeKeyRequiresParam => "MODE +k requires a password parameter".to_string(),
            Reply::ModeLimitRequiresParam => "MODE +l requires a numeric parameter".to_string(),
            Reply::ModeLimitMustBePositive => "User limit must be a positive number".to_string(),
            Reply::ModeOperatorRequiresNick => "MODE +o requires a nickname parameter".to_string(),
            Reply::UserNotInChannel { nick, channel } => {
                format!("User {nick} is not in channel {channel}")
            }

            Reply::Invited { nick, channel } => {
                format!("User {nick} has been invited to channel {channel}")
            }
            Reply::Kicked { nick, channel } => {
                format!("User {nick} has been kicked from channel {channel}")
            }

            Reply::UnknownCommand => "Unknown command.".to_string(),
        }
    }
}
