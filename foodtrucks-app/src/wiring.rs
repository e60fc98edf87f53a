use anyhow::Result;
use foodtrucks_actors::{builder::Builder, finder::FinderActor};
use foodtrucks_config::{self as config, FoodTrucksConfig};
use foodtrucks_core::{Geocoder, NearbyPolicy, NearbyScope, TruckSource};
use foodtrucks_http::HttpClient;
use foodtrucks_sources::{GoogleGeocoder, SfDatasetApi};
use foodtrucks_tui::{TuiActor, TuiMsg, spawn_tui_feeders};
use std::sync::Arc;
use std::time::Duration;

const FINDER_MAILBOX: usize = 64;
const TUI_MAILBOX: usize = 256;

/// The two network collaborators, shared by the view and the headless commands.
#[derive(Clone)]
pub struct Clients {
    pub source: Arc<dyn TruckSource>,
    pub geocoder: Arc<dyn Geocoder>,
}

fn http_client(endpoint: &str, cfg: &config::HttpConfig) -> Result<HttpClient> {
    Ok(HttpClient::new(endpoint)?
        .with_timeout(Duration::from_secs(cfg.timeout_secs))
        .with_retries(cfg.retries))
}

pub fn build_clients(cfg: &FoodTrucksConfig) -> Result<Clients> {
    let mut dataset = SfDatasetApi::with_http(http_client(&cfg.dataset.endpoint, &cfg.http)?);
    if let Some(token) = cfg.dataset.app_token() {
        dataset = dataset.with_app_token(token)?;
    }

    let api_key = cfg.geocoding.api_key().map(str::to_string);
    if api_key.is_none() {
        tracing::warn!("geocoding.api_key not set; geocoding requests will likely be denied");
    }
    let geocoder = GoogleGeocoder::with_http(
        http_client(&cfg.geocoding.endpoint, &cfg.http)?,
        api_key,
    );

    tracing::info!(
        dataset = %cfg.dataset.endpoint,
        geocoding = %cfg.geocoding.endpoint,
        app_token = cfg.dataset.app_token().is_some(),
        timeout_secs = cfg.http.timeout_secs,
        retries = cfg.http.retries,
        "clients.ready"
    );
    Ok(Clients {
        source: Arc::new(dataset),
        geocoder: Arc::new(geocoder),
    })
}

pub fn nearby_policy(cfg: &FoodTrucksConfig) -> NearbyPolicy {
    NearbyPolicy {
        radius_km: cfg.nearby.radius_km,
        scope: match cfg.nearby.scope {
            config::NearbyScope::Available => NearbyScope::Available,
            config::NearbyScope::All => NearbyScope::All,
        },
    }
}

/// Start the finder and the terminal view, then block until quit or CTRL-C.
pub async fn run_tui(cfg: &FoodTrucksConfig, clients: Clients) -> Result<()> {
    let mut b = Builder::new();
    let shutdown = b.shutdown_handle();

    let finder = b.spawn(
        "finder",
        FINDER_MAILBOX,
        FinderActor::new(clients.source, clients.geocoder),
    );

    let tui = TuiActor::new(
        finder,
        nearby_policy(cfg),
        cfg.dataset.available_limit,
        shutdown.clone(),
    )?;
    let tui_addr = b.spawn("tui", TUI_MAILBOX, tui);
    spawn_tui_feeders(tui_addr.clone(), shutdown);

    if tui_addr.send(TuiMsg::Load).await.is_err() {
        anyhow::bail!("terminal view stopped before the dataset load");
    }

    b.run_until_ctrl_c().await
}
