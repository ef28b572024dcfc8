use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use futures::stream::{self, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use vn_weather_bulletin::classify::{Region, Terrain};
use vn_weather_bulletin::clock::{Clock, SystemClock};
use vn_weather_bulletin::config::load_config;
use vn_weather_bulletin::logging;
use vn_weather_bulletin::source::{Geocoder, OpenMeteoClient, TtlCache, WeatherSource};
use vn_weather_bulletin::{Bulletin, BulletinOptions, compose_bulletin};

/// Vietnamese weather bulletins from Open-Meteo, driven by a YAML config.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to YAML config. Search order if not given:
    /// $BULLETIN_CONFIG, ./config/bulletin.yaml, ./config.yaml, ~/.config/vn-weather-bulletin/config.yaml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the output here. If omitted, it is printed to stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Place name or "lat,lon". Repeatable; replaces app.locations.
    #[arg(long = "location")]
    locations: Vec<String>,

    /// Climate region: north | central_south
    #[arg(long)]
    region: Option<String>,

    /// Terrain: flat | slope | mountain
    #[arg(long)]
    terrain: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Seed for the icon fallback, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

const CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    let cfg = load_config(args.config.clone())?;

    let queries = if args.locations.is_empty() {
        cfg.app.locations.clone()
    } else {
        args.locations.clone()
    };
    if queries.is_empty() {
        bail!("No locations given. Use --location or set app.locations in the config");
    }

    let opts = BulletinOptions {
        region: args.region.as_deref().map(Region::from_name).unwrap_or(cfg.app.region),
        terrain: args.terrain.as_deref().map(Terrain::from_name).unwrap_or(cfg.app.terrain),
    };

    let cache = TtlCache::new(Duration::from_secs(cfg.open_meteo.cache_ttl_secs));
    let client = OpenMeteoClient::new(cfg.open_meteo.clone(), cache).context("building HTTP client")?;
    let geocoder = Geocoder::new(client.http().clone(), cfg.open_meteo.clone());
    let now = SystemClock.now();
    info!(locations = queries.len(), region = ?opts.region, terrain = ?opts.terrain, "building bulletins");

    // ---- resolve + fetch (concurrent, input order kept)
    let fetched = stream::iter(queries)
        .map(|query| {
            let client = &client;
            let geocoder = &geocoder;
            async move {
                let loc = geocoder
                    .resolve(&query)
                    .await
                    .with_context(|| format!("resolving location {query:?}"))?;
                let triple = client
                    .fetch_forecast(loc.latitude, loc.longitude, now)
                    .await
                    .with_context(|| format!("fetching forecast for {}", loc.name))?;
                Ok::<_, anyhow::Error>((loc, triple))
            }
        })
        .buffered(CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    // ---- compose (sequential, one RNG)
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut bulletins: Vec<Bulletin> = Vec::new();
    let mut failed = 0usize;
    for result in fetched {
        match result {
            Ok((loc, triple)) => bulletins.push(compose_bulletin(&triple, &loc, &now, &opts, &mut rng)),
            Err(e) => {
                failed += 1;
                error!("{e:#}");
            }
        }
    }
    if bulletins.is_empty() {
        bail!("No bulletin could be built ({failed} location(s) failed)");
    }
    if failed > 0 {
        warn!(failed, "some locations were skipped");
    }

    let rendered = match args.format {
        Format::Text => bulletins
            .iter()
            .map(|b| format!("📍 {}\n{}", b.data.loc.label(), b.text))
            .collect::<Vec<_>>()
            .join("\n\n"),
        Format::Json => serde_json::to_string_pretty(&bulletins)?,
    };

    if let Some(path) = args.out {
        std::fs::write(&path, rendered)
            .with_context(|| format!("writing output to {}", path.display()))?;
    } else {
        println!("{rendered}");
    }

    Ok(())
}
