//! The command grammar: `Name[argument]`.
//!
//! Name is one or more ASCII letters; argument is one or more of any
//! character up to a mandatory trailing `]` (greedy — interior `]`
//! belongs to the argument). Anything else is not a command.

/// A parsed command string, borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    /// The capability name, without brackets.
    pub name: &'a str,

    /// The argument between the brackets.
    pub argument: &'a str,
}

/// Parse a command string against the grammar. Returns `None` for any
/// shape violation — the caller treats that as "Not found", never as an
/// error.
pub fn parse_command(input: &str) -> Option<Command<'_>> {
    let open = input.find('[')?;

    let name = &input[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    if !input.ends_with(']') {
        return None;
    }

    let argument = &input[open + 1..input.len() - 1];
    if argument.is_empty() {
        return None;
    }

    Some(Command { name, argument })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_command() {
        let cmd = parse_command("Search[Riesling]").unwrap();
        assert_eq!(cmd.name, "Search");
        assert_eq!(cmd.argument, "Riesling");
    }

    #[test]
    fn parses_sentence_argument() {
        let cmd = parse_command("Search[What is the best wine for a steak dinner?]").unwrap();
        assert_eq!(cmd.name, "Search");
        assert_eq!(cmd.argument, "What is the best wine for a steak dinner?");
    }

    #[test]
    fn interior_bracket_belongs_to_argument() {
        let cmd = parse_command("Search[a[0] and b]").unwrap();
        assert_eq!(cmd.argument, "a[0] and b");
    }

    #[test]
    fn rejects_missing_brackets() {
        assert!(parse_command("Search").is_none());
    }

    #[test]
    fn rejects_missing_closing_bracket() {
        assert!(parse_command("Search[Riesling").is_none());
    }

    #[test]
    fn rejects_empty_name() {
        assert!(parse_command("[Riesling]").is_none());
    }

    #[test]
    fn rejects_empty_argument() {
        assert!(parse_command("Search[]").is_none());
    }

    #[test]
    fn rejects_non_letter_name() {
        assert!(parse_command("Search2[x]").is_none());
        assert!(parse_command("Sea rch[x]").is_none());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_command("").is_none());
    }

    #[test]
    fn case_is_preserved_for_the_caller() {
        let cmd = parse_command("search[Riesling]").unwrap();
        assert_eq!(cmd.name, "search");
    }
}
