mod cli;
mod commands;
mod error;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chirpstream_core::{FeedConfig, TlsVerification};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

// The store is single-threaded by design; every dispatch happens on this
// one runtime thread, with the transport tasks feeding it over channels.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a feed connection
        Command::Config(cmd) => commands::config_cmd::handle(cmd, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "chirpstream", &mut std::io::stdout());
            Ok(())
        }

        Command::Watch(args) => {
            let feed_config = build_feed_config(&cli.global)?;
            commands::watch::handle(args, feed_config).await
        }
    }
}

/// Build a `FeedConfig` from CLI overrides, or fall back to the active
/// profile in the config file.
fn build_feed_config(global: &GlobalOpts) -> Result<FeedConfig, CliError> {
    // A --stream flag bypasses the config file entirely.
    if let Some(ref stream) = global.stream {
        let stream_url = stream.parse().map_err(|_| CliError::Validation {
            field: "stream".into(),
            reason: format!("invalid URL: {stream}"),
        })?;

        let socket_url = match global.socket_url {
            Some(ref raw) => Some(raw.parse().map_err(|_| CliError::Validation {
                field: "socket-url".into(),
                reason: format!("invalid URL: {raw}"),
            })?),
            None => None,
        };

        let tls = if global.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        };

        return Ok(FeedConfig {
            stream_url,
            socket_url,
            tls,
            connect_timeout: Duration::from_secs(global.timeout),
        });
    }

    let cfg = chirpstream_config::load_config_or_default();
    let profile_name = chirpstream_config::active_profile_name(global.profile.as_deref(), &cfg);

    let profile =
        chirpstream_config::resolve_profile(&cfg, &profile_name).map_err(|_| {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            CliError::ProfileNotFound {
                name: profile_name.clone(),
                available: available.join(", "),
            }
        })?;

    let mut feed = chirpstream_config::profile_to_feed_config(profile, &cfg.defaults)?;
    if global.insecure {
        feed.tls = TlsVerification::DangerAcceptInvalid;
    }

    Ok(feed)
}
