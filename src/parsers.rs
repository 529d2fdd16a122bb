//! Line tokenizing. Verbs are compared case-sensitively as uppercase (§4.2);
//! there is no `:trailing` marker in this wire protocol (§9), so the only
//! free-form payloads are the PRIVMSG message and the TOPIC argument, each
//! of which is "everything after the first argument, with one leading space
//! consumed".

use nom::{IResult, Parser, bytes::complete::take_till1};

/// Splits one line into its verb and the (possibly empty) remainder, with
/// the single separating space consumed. A line with no space has an empty
/// remainder.
pub fn split_verb(line: &str) -> (&str, &str) {
    match word(line) {
        Ok((rest, verb)) => (verb, rest.strip_prefix(' ').unwrap_or(rest)),
        Err(_) => (line, ""),
    }
}

/// Splits `args` into its first whitespace-delimited token and everything
/// after it, consuming exactly one leading space. Used for PRIVMSG and
/// TOPIC, where the second part is a free-form payload that must not be
/// tokenized further.
pub fn split_first_arg(args: &str) -> Option<(&str, &str)> {
    let (rest, first) = word(args).ok()?;
    let message = rest.strip_prefix(' ').unwrap_or(rest);
    Some((first, message))
}

/// Splits on arbitrary runs of whitespace into fixed-arity tokens, for
/// commands where every argument is a plain word (NICK, USER, JOIN, KICK,
/// MODE, INVITE).
pub fn tokens(args: &str) -> Vec<&str> {
    args.split_whitespace().collect()
}

fn word(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ' ').parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_verb_separates_command_from_rest() {
        assert_eq!(split_verb("NICK alice"), ("NICK", "alice"));
        assert_eq!(split_verb("JOIN #room hunter2"), ("JOIN", "#room hunter2"));
    }

    #[test]
    fn split_verb_handles_bare_command() {
        assert_eq!(split_verb("NICK"), ("NICK", ""));
    }

    #[test]
    fn split_first_arg_keeps_message_intact() {
        assert_eq!(
            split_first_arg("#room hello there friend"),
            Some(("#room", "hello there friend"))
        );
    }

    #[test]
    fn split_first_arg_with_no_payload() {
        assert_eq!(split_first_arg("#room"), Some(("#room", "")));
    }

    #[test]
    fn split_first_arg_on_empty_input() {
        assert_eq!(split_first_arg(""), None);
    }

    #[test]
    fn tokens_splits_on_any_whitespace_run() {
        assert_eq!(tokens("#room  hunter2"), vec!["#room", "hunter2"]);
        assert_eq!(tokens(""), Vec::<&str>::new());
    }
}
