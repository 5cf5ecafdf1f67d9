//! authstore - log in to a REST backend and keep the session between runs.
//!
//! Tokens are persisted in the configured storage backend; outcomes are
//! reported as toasts on stderr while data goes to stdout.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authstore_core::config::resolve_api_url;
use authstore_core::notify::TerminalSink;
use authstore_core::{ApiClient, ApiError, AuthState, AuthStatus, Config, FetchOutcome, Notifier, Storage};

#[derive(Parser)]
#[command(name = "authstore", version, about = "Client-side session for a REST auth backend")]
struct Cli {
    /// Override the API base URL for this run
    #[arg(long, global = true, env = "AUTHSTORE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session tokens
    Login {
        /// Email address; prompted for when omitted
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Fetch and print the current user
    Whoami,
    /// Forget the stored session
    Logout,
    /// Print whether a session is stored
    Status,
    /// Renew the access token with the refresh token
    Refresh,
}

type CliAuth = AuthState<ApiClient, Box<dyn Storage>>;

/// Loaded configuration plus whether it may be written back.
/// A config that failed to load is never saved over the user's file.
struct CliConfig {
    config: Config,
    writable: bool,
}

impl CliConfig {
    fn from_load(result: Result<Config>) -> Self {
        match result {
            Ok(config) => Self {
                config,
                writable: true,
            },
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults without saving");
                Self {
                    config: Config::default(),
                    writable: false,
                }
            }
        }
    }

    fn save(&self) -> Result<()> {
        if self.writable {
            self.config.save()?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if self.writable {
            self.config.save_to(path)?;
        }
        Ok(())
    }
}

/// API URL for this run. A `--api-url` flag or env override is used as-is
/// and never stored in the config.
fn run_api_url(override_url: Option<&str>, config: &Config) -> Result<String> {
    match override_url {
        Some(url) => resolve_api_url(Some(url), None, None),
        None => config.api_url(),
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = CliConfig::from_load(Config::load());

    let api_url = run_api_url(cli.api_url.as_deref(), &config.config)?;
    debug!(api_url = %api_url, storage = ?config.config.storage, "Config resolved");

    let notifier = Arc::new(Notifier::new(TerminalSink::stderr()));
    let api = ApiClient::new(&api_url)?;
    let storage = config.config.open_storage()?;
    let mut auth = AuthState::new(api, storage)?.with_notifier(Arc::clone(&notifier));

    match cli.command {
        Command::Login { email } => login(&mut auth, &notifier, &mut config, email).await,
        Command::Whoami => whoami(&mut auth, &notifier).await,
        Command::Logout => {
            auth.logout()?;
            notifier.success("Logged out");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let status = match auth.status() {
                AuthStatus::Authenticated => "authenticated",
                AuthStatus::Anonymous => "anonymous",
            };
            println!("{}", status);
            Ok(ExitCode::SUCCESS)
        }
        Command::Refresh => {
            auth.refresh_access_token()?;
            notifier.warning("Token refresh is not supported; log in again when the session expires");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn login(
    auth: &mut CliAuth,
    notifier: &Notifier,
    config: &mut CliConfig,
    email: Option<String>,
) -> Result<ExitCode> {
    let email = match email {
        Some(email) => email,
        None => prompt_email(config.config.last_email.as_deref())?,
    };
    if email.is_empty() {
        notifier.error("Email and password required");
        return Ok(ExitCode::FAILURE);
    }

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    if password.is_empty() {
        notifier.error("Email and password required");
        return Ok(ExitCode::FAILURE);
    }

    if let Err(e) = auth.login(&email, &password).await {
        // API rejections are already shown as a toast by the session
        match e.downcast_ref::<ApiError>() {
            Some(api_error) if api_error.is_auth_failure() => {
                notifier.info("Check the email and password and try again");
            }
            Some(_) => {}
            None => {
                notifier.error(&format!("{:#}", e));
            }
        }
        return Ok(ExitCode::FAILURE);
    }

    config.config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    match (auth.status(), auth.user()) {
        (AuthStatus::Authenticated, Some(user)) => {
            info!("Login complete");
            notifier.success(&format!("Logged in as {}", user.display_name()));
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            notifier.error("Logged in, but the user profile could not be loaded. Session cleared.");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn whoami(auth: &mut CliAuth, notifier: &Notifier) -> Result<ExitCode> {
    match auth.fetch_user().await? {
        FetchOutcome::Loaded => {
            if let Some(user) = auth.user() {
                println!("{}", serde_json::to_string_pretty(user)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        FetchOutcome::Skipped => {
            notifier.warning("Not logged in");
            Ok(ExitCode::FAILURE)
        }
        FetchOutcome::SessionCleared => {
            notifier.error("Session is no longer valid, please log in again");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_email) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}
