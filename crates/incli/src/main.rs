mod bootstrap;

use anyhow::{Context, Result};
use clap::Parser;
use incli_api::HttpClient;
use incli_core::query::{CatalogQuery, IncidentQuery};
use incli_core::settings::{CatalogCommand, Command, IncidentsCommand, Settings, StoredConfig};
use incli_runtime::watch::LiveMonitor;
use incli_runtime::{catalog, incidents};
use incli_ui::live_view::TerminalView;
use incli_ui::presenter::print_json;

#[tokio::main]
async fn main() {
    let settings = Settings::parse();

    if let Err(e) = bootstrap::setup_logging(settings.effective_log_level()) {
        eprintln!("failed to set up logging: {e}");
        std::process::exit(1);
    }

    tracing::debug!("incli v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(settings).await {
        tracing::error!("failed to run: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<()> {
    // Flags are validated before the client exists, so a bad combination
    // never reaches the network.
    match &settings.command {
        Command::Catalog {
            action: CatalogCommand::Get(args),
        } => {
            let query = CatalogQuery::from_args(args)?;
            let client = connect(&settings)?;
            let found = catalog::get_catalog_entries(&client, &query)
                .await
                .context("failed to find catalog entry")?;
            print_json(&found).context("failed to marshal json")?;
        }

        Command::Incidents {
            action: IncidentsCommand::Get(args),
        } => {
            let query = IncidentQuery::from_args(args)?;
            let client = connect(&settings)?;

            if query == IncidentQuery::Watch {
                let shutdown = bootstrap::shutdown_on_ctrl_c();
                let mut monitor = LiveMonitor::new(&client, TerminalView::stdout());
                monitor
                    .run(shutdown)
                    .await
                    .context("failed to list incidents")?;
            } else {
                let found = incidents::get_incidents(&client, &query)
                    .await
                    .context("failed to list incidents")?;
                print_json(&found).context("failed to marshal json")?;
            }
        }
    }

    Ok(())
}

fn connect(settings: &Settings) -> Result<HttpClient> {
    let stored = StoredConfig::load().context("failed to load config")?;
    let config = settings.api_config(&stored)?;
    tracing::info!(base_url = %config.base_url, page_size = config.page_size, "connecting");
    Ok(HttpClient::new(&config)?)
}
