use chrono::Utc;
use clap::{Parser, Subcommand};
use djbook_core::{
    render, Coordinates, GeminiClient, GeminiConfig, IpLocationConfig, IpLocationProvider,
    LocationCapability, LocationError, LocationProvider, PlacesBackend, SessionController,
    SessionState, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, DEFAULT_GEOLOCATION_URL,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "djbook", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Gemini API key
    #[arg(
        long,
        env = "GEMINI_API_KEY",
        hide_env_values = true,
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    api_key: String,

    /// Gemini model identifier
    #[arg(long, env = "DJBOOK_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "DJBOOK_GEMINI_ENDPOINT", default_value = DEFAULT_GEMINI_ENDPOINT)]
    endpoint: String,

    /// Fixed latitude; skips IP geolocation
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Fixed longitude; skips IP geolocation
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// IP geolocation lookup URL
    #[arg(long, env = "DJBOOK_GEOLOCATION_URL", default_value = DEFAULT_GEOLOCATION_URL)]
    geolocation_url: String,

    /// Seconds to wait for the geolocation lookup
    #[arg(long, default_value = "10")]
    geolocation_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Describe the vibe once and print the recommendations.
    Search {
        /// What you're looking for, e.g. "techno DJ for a warehouse party"
        #[arg(long)]
        query: String,
    },
    /// Keep a session open and search line by line (`:retry` re-requests location, `:quit` exits).
    Interactive,
}

/// Where the session gets its position from.
enum Locator {
    Fixed(LocationCapability),
    Ip(IpLocationProvider),
}

#[async_trait::async_trait]
impl LocationProvider for Locator {
    async fn acquire_location(&self) -> Result<Coordinates, LocationError> {
        match self {
            Self::Fixed(capability) => capability.acquire_location().await,
            Self::Ip(provider) => provider.acquire_location().await,
        }
    }
}

impl Cli {
    fn locator(&self) -> anyhow::Result<Locator> {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            let coordinates = Coordinates::new(latitude, longitude)?;
            return Ok(Locator::Fixed(LocationCapability::Available(coordinates)));
        }

        let provider = IpLocationProvider::new(IpLocationConfig {
            url: self.geolocation_url.clone(),
            timeout: Duration::from_secs(self.geolocation_timeout_secs),
        })?;
        Ok(Locator::Ip(provider))
    }

    fn gemini(&self) -> anyhow::Result<GeminiClient> {
        let config = GeminiConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        };
        Ok(GeminiClient::new(config)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let backend = cli.gemini()?;
    let locator = cli.locator()?;

    info!(
        version = app_version,
        model = %backend.model(),
        started_at = %Utc::now().to_rfc3339(),
        "djbook boot"
    );

    let mut controller = SessionController::new(locator, backend);
    controller.start().await;

    match cli.command {
        Command::Search { query } => run_search(&mut controller, &query).await,
        Command::Interactive => run_interactive(&mut controller).await,
    }
}

async fn run_search<L, B>(controller: &mut SessionController<L, B>, query: &str) -> anyhow::Result<()>
where
    L: LocationProvider + Send + Sync,
    B: PlacesBackend + Send + Sync,
{
    controller.submit(query).await;
    let session = controller.session();
    print!("{}", render(session));

    match session.state() {
        SessionState::Result(_) => Ok(()),
        SessionState::Error(message) => Err(anyhow::anyhow!(message.clone())),
        SessionState::LocationDenied(reason) => Err(anyhow::anyhow!(reason.clone())),
        state => {
            warn!(?state, "search did not run");
            Err(anyhow::anyhow!(session
                .notice()
                .unwrap_or("search did not run")
                .to_string()))
        }
    }
}

async fn run_interactive<L, B>(controller: &mut SessionController<L, B>) -> anyhow::Result<()>
where
    L: LocationProvider + Send + Sync,
    B: PlacesBackend + Send + Sync,
{
    println!("{}", render(controller.session()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(controller.session().can_submit());

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            ":quit" | ":exit" => break,
            ":retry" => {
                controller.retry_location().await;
            }
            _ => {
                controller.submit(&line).await;
            }
        }

        println!("{}", render(controller.session()));
    }

    Ok(())
}

fn print_prompt(can_submit: bool) {
    use std::io::Write;

    let marker = if can_submit { "vibe> " } else { "(waiting for location) vibe> " };
    print!("{marker}");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn api_key_is_required_by_the_parser() {
        std::env::remove_var("GEMINI_API_KEY");

        let missing = Cli::try_parse_from(["djbook", "search", "--query", "techno"])
            .err()
            .expect("missing key should be rejected");
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        assert!(Cli::try_parse_from(["djbook", "--api-key", "", "search", "--query", "techno"]).is_err());
    }

    #[test]
    fn fixed_location_flags_come_in_pairs() {
        let cli = Cli::try_parse_from([
            "djbook",
            "--api-key",
            "key",
            "--latitude",
            "12.97",
            "--longitude",
            "77.59",
            "interactive",
        ])
        .expect("valid flags");
        assert_eq!(cli.api_key, "key");
        assert_eq!(cli.model, DEFAULT_GEMINI_MODEL);
        assert!(matches!(cli.locator(), Ok(Locator::Fixed(_))));

        assert!(Cli::try_parse_from(["djbook", "--api-key", "key", "--latitude", "1.0", "interactive"]).is_err());
    }
}
