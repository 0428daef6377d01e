use std::time::Duration;

use crate::config::{parse_refresh_ms, DEFAULT_REFRESH_MS};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Overrides the configured refresh interval
    pub interval: Option<Duration>,
    /// Tracked from startup, in the order given
    pub symbols: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: i32,
    pub message: String,
}

impl ParseError {
    fn usage(message: String) -> Self {
        Self {
            code: 2,
            message: format!("{message}\n\n{}", help_text(env!("CARGO_PKG_NAME"))),
        }
    }
}

#[must_use]
pub fn help_text(bin_name: &str) -> String {
    indoc::formatdoc! {"
        Stock Screener

        Usage:
          {bin_name} [options] [SYMBOL...]

        Options:
          -h, --help             Show help
          -V, --version          Show version
          -i, --interval <MS>    Price refresh interval in milliseconds (default {DEFAULT_REFRESH_MS})
    "}
}

#[must_use]
pub fn version_text() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn parse_args<I, S>(args: I) -> Result<Command, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut show_help = false;
    let mut show_version = false;
    let mut args = args.into_iter().map(Into::<String>::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => show_help = true,
            "-V" | "--version" => show_version = true,
            "-i" | "--interval" => {
                let Some(value) = args.next() else {
                    return Err(ParseError::usage(format!("{arg} requires a value")));
                };
                parsed.interval = Some(parse_interval(&value)?);
            }
            other => {
                if let Some(value) = other.strip_prefix("--interval=") {
                    parsed.interval = Some(parse_interval(value)?);
                } else if other.starts_with('-') {
                    return Err(ParseError::usage(format!("unknown option: {other}")));
                } else {
                    parsed.symbols.push(other.to_string());
                }
            }
        }
    }

    if show_help {
        return Ok(Command::Help);
    }

    if show_version {
        return Ok(Command::Version);
    }

    Ok(Command::Run(parsed))
}

fn parse_interval(raw: &str) -> Result<Duration, ParseError> {
    parse_refresh_ms(raw)
        .map(Duration::from_millis)
        .ok_or_else(|| ParseError::usage(format!("invalid interval: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_run_command() {
        let result = parse_args(Vec::<String>::new());
        assert_eq!(result, Ok(Command::Run(Args::default())));
    }

    #[test]
    fn parses_help_command() {
        assert_eq!(parse_args(["--help"]), Ok(Command::Help));
        assert_eq!(parse_args(["AAPL", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn parses_version_command() {
        let result = parse_args(["--version"]);
        assert_eq!(result, Ok(Command::Version));
    }

    #[test]
    fn parses_interval_and_symbols() {
        let result = parse_args(["aapl", "-i", "2500", "MSFT"]);
        assert_eq!(
            result,
            Ok(Command::Run(Args {
                interval: Some(Duration::from_millis(2500)),
                symbols: vec!["aapl".to_string(), "MSFT".to_string()],
            }))
        );

        let result = parse_args(["--interval=1000"]);
        match result {
            Ok(Command::Run(args)) => assert_eq!(args.interval, Some(Duration::from_secs(1))),
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn fails_on_missing_or_invalid_interval() {
        let err = parse_args(["--interval"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("requires a value"));

        let err = parse_args(["-i", "0"]).expect_err("expected parse error");
        assert!(err.message.contains("invalid interval"));

        let err = parse_args(["-i", "fast"]).expect_err("expected parse error");
        assert!(err.message.contains("invalid interval"));
    }

    #[test]
    fn fails_on_unknown_option() {
        let result = parse_args(["--unknown"]);
        let err = result.expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("unknown option"));
    }
}
