//! Command invocations handed to a [`CommandDispatcher`](crate::CommandDispatcher).
//!
//! A command is a name, an optional primary argument and an ordered list of
//! `key=value` option strings. Values are rendered with Rust's formatting
//! machinery, which never consults the process locale: booleans are always
//! `true`/`false` and integers never carry group or decimal separators.

use std::fmt;

/// One daemon command, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    argument: Option<String>,
    options: Vec<String>,
}

impl Command {
    /// Creates a command with no argument and no options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
            options: Vec::new(),
        }
    }

    /// Sets the primary argument.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Sets the primary argument if one is given.
    #[must_use]
    pub fn with_optional_argument(mut self, argument: Option<impl Into<String>>) -> Self {
        self.argument = argument.map(Into::into);
        self
    }

    /// Appends a `key=value` option.
    ///
    /// Options keep their insertion order and duplicate keys are passed
    /// through untouched.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.options.push(format!("{key}={value}"));
        self
    }

    /// Appends a boolean option rendered as `true` or `false`.
    #[must_use]
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_option(key, if value { "true" } else { "false" })
    }

    /// Appends an integer count option.
    #[must_use]
    pub fn with_count(self, key: &str, value: u32) -> Self {
        self.with_option(key, value)
    }

    /// Returns the command name (e.g. `ping`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primary argument.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Returns the option strings in insertion order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(arg) = &self.argument {
            write!(f, " {arg}")?;
        }
        for option in &self.options {
            write!(f, " {option}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_bare_command() {
        let cmd = Command::new("shutdown");
        assert_eq!(cmd.name(), "shutdown");
        assert!(cmd.argument().is_none());
        assert!(cmd.options().is_empty());
    }

    #[test_case(true, "recursive=true" ; "true")]
    #[test_case(false, "recursive=false" ; "false")]
    fn test_bool_option(value: bool, expected: &str) {
        let cmd = Command::new("resolve").with_bool("recursive", value);
        assert_eq!(cmd.options(), [expected]);
    }

    #[test_case(0, "count=0" ; "zero")]
    #[test_case(10, "count=10" ; "default")]
    #[test_case(1_234_567, "count=1234567" ; "no group separators")]
    #[test_case(u32::MAX, "count=4294967295" ; "max")]
    fn test_count_option(value: u32, expected: &str) {
        let cmd = Command::new("ping").with_count("count", value);
        assert_eq!(cmd.options(), [expected]);
    }

    #[test]
    fn test_options_keep_order_and_duplicates() {
        let cmd = Command::new("ping")
            .with_count("count", 3)
            .with_option("timeout", "1s")
            .with_count("count", 5);
        assert_eq!(cmd.options(), ["count=3", "timeout=1s", "count=5"]);
    }

    #[test]
    fn test_optional_argument() {
        let none = Command::new("id").with_optional_argument(None::<String>);
        assert!(none.argument().is_none());

        let some = Command::new("id").with_optional_argument(Some("QmPeer"));
        assert_eq!(some.argument(), Some("QmPeer"));
    }

    #[test]
    fn test_display() {
        let cmd = Command::new("resolve")
            .with_argument("/ipns/alice")
            .with_bool("recursive", true);
        assert_eq!(cmd.to_string(), "resolve /ipns/alice recursive=true");
        assert_eq!(Command::new("version").to_string(), "version");
    }
}
