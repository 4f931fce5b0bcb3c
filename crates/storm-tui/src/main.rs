//! stormwatch - active weather alerts in the terminal
//!
//! Polls the alert feed, shows every alert or a single forecast office,
//! and rotates pages while nobody is touching the keyboard.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono_tz::Tz;
use clap::Parser;
use ratatui::prelude::*;
use storm_feed::{AlertSource, DEFAULT_ENDPOINT, FeedClient, FeedConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use storm_tui::config::DashboardConfig;
use storm_tui::dashboard::Dashboard;
use storm_tui::demo::DemoSource;
use storm_tui::events::EventHandler;
use storm_tui::terminal::{self, TerminalSession};
use storm_tui::ui;

#[derive(Parser)]
#[command(name = "stormwatch")]
#[command(about = "Stormwatch - live U.S. weather alert dashboard")]
#[command(version)]
struct Cli {
    /// Alert feed endpoint
    #[arg(long, env = "STORMWATCH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// User-Agent sent with every request
    #[arg(long, env = "STORMWATCH_USER_AGENT")]
    user_agent: Option<String>,

    /// Only show alerts issued by this office, e.g. "Peachtree City"
    #[arg(long, env = "STORMWATCH_OFFICE")]
    office: Option<String>,

    /// Alerts per page in the office view
    #[arg(long, env = "STORMWATCH_PAGE_SIZE", default_value = "6")]
    page_size: usize,

    /// Feed refresh interval in seconds
    #[arg(long, env = "STORMWATCH_REFRESH_SECS", default_value = "60")]
    refresh_secs: u64,

    /// IANA zone for the clock and alert timestamps
    #[arg(long, env = "STORMWATCH_TIMEZONE", default_value = "America/New_York")]
    timezone: String,

    /// Enable demo mode with fake alerts
    #[arg(long)]
    demo: bool,
}

impl Cli {
    fn dashboard_config(&self) -> anyhow::Result<DashboardConfig> {
        let zone: Tz = self
            .timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {e}", self.timezone))?;

        let base = match &self.office {
            Some(office) => DashboardConfig::for_office(office.clone()),
            None => DashboardConfig::default(),
        };

        Ok(base
            .with_page_size(self.page_size)
            .with_refresh_interval(Duration::from_secs(self.refresh_secs))
            .with_timezone(zone))
    }

    fn feed_config(&self) -> FeedConfig {
        let config = FeedConfig::new(self.endpoint.clone());
        match &self.user_agent {
            Some(user_agent) => config.with_user_agent(user_agent.clone()),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (to stderr, not the alternate screen)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("storm_tui=info".parse()?))
        .init();

    // Fail on bad flags before touching the terminal
    let config = cli.dashboard_config()?;
    let client = if cli.demo {
        None
    } else {
        let feed = cli.feed_config();
        Some(FeedClient::new(&feed).with_context(|| format!("feed client for {}", feed.endpoint))?)
    };

    // Run application; the session restores the terminal when dropped
    terminal::install_panic_hook();
    let mut session = TerminalSession::enter()?;
    let result = match client {
        Some(client) => run_app(session.terminal(), config, Arc::new(client)).await,
        None => run_app(session.terminal(), config, Arc::new(DemoSource::new(12))).await,
    };
    drop(session);

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: DashboardConfig,
    source: Arc<S>,
) -> anyhow::Result<()>
where
    S: AlertSource + 'static,
{
    let tick_rate = Duration::from_millis(250);
    let mut event_handler = EventHandler::new(tick_rate);
    let mut dashboard = Dashboard::new(config, source, event_handler.sender());

    let size = terminal.size()?;
    dashboard.set_viewport(Rect::new(0, 0, size.width, size.height));
    dashboard.mount();

    // Main loop
    let outcome = loop {
        if let Err(err) = terminal.draw(|frame| ui::draw(frame, dashboard.app())) {
            break Err(err.into());
        }
        if !dashboard.app().running {
            break Ok(());
        }

        match event_handler.next().await {
            Some(event) => dashboard.handle(event),
            None => break Ok(()),
        }
    };

    dashboard.unmount();
    info!("dashboard closed");
    outcome
}
