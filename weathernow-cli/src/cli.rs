use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{CustomType, Password, Select};
use std::{fs, path::PathBuf, sync::Arc};
use weathernow_core::{
    AuthError, AuthService, Config, Dashboard, FileAccountStore, Query, RecentLocations,
    TemperatureUnit, recent::FileStore,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Weather Now: live conditions from Open-Meteo")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose display unit and request timeout.
    Configure,

    /// Create an account.
    Register {
        email: String,
    },

    /// Log in and remember the session on this machine.
    Login {
        email: String,
    },

    /// Forget the current session.
    Logout,

    /// Show current weather for a city or a pair of coordinates.
    Show {
        /// City name, e.g. "Paris".
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude for a reverse lookup (use with --lon).
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude for a reverse lookup (use with --lat).
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Display unit: c/celsius or f/fahrenheit. Defaults to the configured unit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Print the snapshot as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// List recently viewed locations.
    Recent,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Register { email } => register(&email),
            Command::Login { email } => login(&email),
            Command::Logout => logout(),
            Command::Show { city, lat, lon, unit, json } => {
                let query = match (city, lat, lon) {
                    (Some(city), _, _) => Query::City(city),
                    (None, Some(latitude), Some(longitude)) => {
                        Query::Coordinates { latitude, longitude }
                    }
                    _ => bail!("Please enter a city name, or pass --lat and --lon."),
                };
                show(query, unit, json).await
            }
            Command::Recent => {
                let recent = RecentLocations::open(Arc::new(recent_store()?));
                match render::recent(recent.names()) {
                    Some(line) => println!("{line}"),
                    None => println!("No recent locations yet."),
                }
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let start = TemperatureUnit::all().iter().position(|u| *u == cfg.unit).unwrap_or(0);
    cfg.unit = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Unit selection cancelled")?;

    cfg.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(cfg.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Timeout prompt cancelled")?;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn register(email: &str) -> Result<()> {
    let password = Password::new("Password:")
        .with_custom_confirmation_message("Confirm password:")
        .prompt()
        .context("Password prompt cancelled")?;

    match accounts()?.register(email, &password) {
        Ok(_) => {
            println!("User registered successfully. Run `weathernow login {email}` next.");
            Ok(())
        }
        Err(AuthError::DuplicateEmail) => bail!("User already exists"),
        Err(e) => Err(e.into()),
    }
}

fn login(email: &str) -> Result<()> {
    let password = Password::new("Password:")
        .without_confirmation()
        .prompt()
        .context("Password prompt cancelled")?;

    let token = accounts()?.login(email, &password)?;
    let path = session_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    fs::write(&path, &token)
        .with_context(|| format!("Failed to write session file: {}", path.display()))?;

    println!("Logged in as {email}.");
    Ok(())
}

fn logout() -> Result<()> {
    let path = session_path()?;
    if let Some(token) = read_token(&path)? {
        accounts()?.logout(&token)?;
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
    }
    println!("Logged out.");
    Ok(())
}

async fn show(query: Query, unit: Option<TemperatureUnit>, json: bool) -> Result<()> {
    require_session()?;

    let cfg = Config::load()?;
    let unit = unit.unwrap_or(cfg.unit);
    let dashboard = Dashboard::from_config(&cfg)?;

    let snap = dashboard.search(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        println!("{}", render::snapshot(&snap, unit));
        if let Some(line) = render::recent(&dashboard.recent()) {
            println!("\n{line}");
        }
    }
    Ok(())
}

/// The dashboard is only reachable with a live session.
fn require_session() -> Result<()> {
    let token = read_token(&session_path()?)?
        .ok_or_else(|| anyhow!("Not logged in.\nHint: run `weathernow login <email>` first."))?;

    match accounts()?.verify(&token) {
        Ok(user_id) => {
            tracing::debug!(%user_id, "Session verified");
            Ok(())
        }
        Err(e @ (AuthError::InvalidToken | AuthError::SessionExpired)) => Err(anyhow!(
            "{e}\nHint: run `weathernow login <email>` to start a new session."
        )),
        Err(e) => Err(e.into()),
    }
}

fn accounts() -> Result<AuthService<FileAccountStore>> {
    Ok(AuthService::new(FileAccountStore::new(Config::data_dir()?.join("accounts.json"))))
}

fn recent_store() -> Result<FileStore> {
    Ok(FileStore::new(Config::data_dir()?.join("recent.json")))
}

fn session_path() -> Result<PathBuf> {
    Ok(Config::data_dir()?.join("session"))
}

fn read_token(path: &std::path::Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let token = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    let token = token.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}
