//! Command-line argument parsing.

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Print the version and exit
    Version,
    /// Forget the stored session and exit
    Logout,
    /// Start the interactive shell, optionally against another backend
    Run { server: Option<String> },
    /// Unusable arguments; the message says why
    Invalid(String),
}

/// Parse `std::env::args()`-style arguments (program name first).
///
/// ```
/// use thinktoart::cli::{parse_args, CliCommand};
///
/// let args = vec!["thinktoart".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut server = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--logout" => return CliCommand::Logout,
            "--server" => match args.next() {
                Some(url) if !url.starts_with('-') => server = Some(url),
                _ => return CliCommand::Invalid("--server needs a URL".to_string()),
            },
            other => {
                if let Some(url) = other.strip_prefix("--server=") {
                    server = Some(url.to_string());
                } else {
                    return CliCommand::Invalid(format!("unknown argument '{}'", other));
                }
            }
        }
    }
    CliCommand::Run { server }
}
