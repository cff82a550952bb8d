use color_eyre::Result;
use thinktoart::cli::{handle_logout, parse_args, version_line, CliCommand};
use thinktoart::shell::{Output, Shell};
use thinktoart::startup::{init_logging, ClientConfig, Services};
use tokio::io::BufReader;

const USAGE: &str = "Usage: thinktoart [--server <url>] [--logout] [--version]";

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Flags that never touch the network or the log file
    match &command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Invalid(message) => {
            eprintln!("thinktoart: {}\n{}", message, USAGE);
            std::process::exit(2);
        }
        _ => {}
    }

    color_eyre::install()?;

    let mut config = ClientConfig::from_env();
    if let CliCommand::Run {
        server: Some(server),
    } = &command
    {
        config = config.with_server_url(server.clone());
    }

    init_logging(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    if command == CliCommand::Logout {
        let had_token = runtime.block_on(handle_logout(&config))?;
        println!(
            "{}",
            if had_token {
                "Signed out."
            } else {
                "No stored session."
            }
        );
        return Ok(());
    }

    runtime.block_on(async {
        let services = Services::production(&config);
        match services.restore().await {
            Ok(true) => tracing::info!("Stored session restored"),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Stored session not usable: {}", e);
                services.chat.notifier().report(&e);
            }
        }

        println!("{} connected to {}", version_line(), config.server_url);
        let mut shell = Shell::new(services, Output::stdout());
        shell.run(BufReader::new(tokio::io::stdin())).await?;
        Ok::<(), color_eyre::Report>(())
    })
}
