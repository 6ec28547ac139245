//! Shell utility functions

/// Escape a string for use in a shell command
///
/// Quotes only when the string contains characters with special meaning in
/// the shell, using single quotes.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '=' | '/' | '.' | ':' | ',' | '+'))
    {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Render a program and its arguments as a copy-pasteable command line.
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(shell_quote(program))
        .chain(args.iter().map(|a| shell_quote(a.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("foo"), "foo");
        assert_eq!(shell_quote("foo bar"), "'foo bar'");
        assert_eq!(shell_quote("foo'bar"), "'foo'\\''bar'");
        assert_eq!(shell_quote("g++"), "g++");
        assert_eq!(shell_quote("^firefox$"), "'^firefox$'");
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line("pacman", &["-Ss", "^zen browser$"]),
            "pacman -Ss '^zen browser$'"
        );
        assert_eq!(command_line::<&str>("flatpak", &[]), "flatpak");
    }
}
