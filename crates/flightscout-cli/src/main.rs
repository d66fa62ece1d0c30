// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use flightscout_core::airport_search::{AirportSearchParams, AirportSortField};
use flightscout_core::config::{ConfigManager, EngineConfig};
use flightscout_core::date_keywords::{DateKeywordParser, ParsedDate};
use flightscout_core::flight_search::{AirportFilter, FlightSearchParams};
use flightscout_core::geolocation::{FixedPositionProvider, NoPositionProvider, PositionProvider};
use flightscout_core::nearby::{NearbyAirportOptions, NearbySortField};
use flightscout_core::query::{LatLonBoundsParams, PagingParams, SortSpec};
use flightscout_core::seeder::SeedOutcome;
use flightscout_core::source::{DirectorySource, DocumentSource, EmbeddedSource};
use flightscout_core::{ContinentCode, Engine, Geolocator, HierarchicalAirportSearchParams};
use flightscout_geo::{DistanceUnit, GeoPoint};
use serde::Serialize;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to flightscout.json in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing airports.json, territories.json and continents.json
    #[arg(long, global = true, env = "FLIGHTSCOUT_DATA")]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search airports by code, country, continent and bounds
    Airports {
        #[command(flatten)]
        filter: AirportArgs,
        /// Sort keys, e.g. "country:asc,name:desc"
        #[arg(long)]
        sort: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Rank airports by distance from a point
    Nearby {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
        /// Fall back to the device position when no --lat/--lon is given
        #[arg(long)]
        here: bool,
        /// Device position reported to --here, as "LAT,LON"
        #[arg(long, env = "FLIGHTSCOUT_POSITION", allow_hyphen_values = true)]
        position: Option<String>,
        /// km, miles or nautical-miles
        #[arg(long, default_value = "km")]
        units: DistanceUnit,
        /// Only airports within this distance (in --units)
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long)]
        max_results: Option<usize>,
        #[command(flatten)]
        filter: AirportArgs,
        /// Sort keys, e.g. "distance:desc"
        #[arg(long)]
        sort: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Seed a synthetic schedule and search it
    Flights {
        #[arg(long = "from-code", value_delimiter = ',')]
        from_codes: Vec<String>,
        #[arg(long = "from-country", value_delimiter = ',')]
        from_countries: Vec<String>,
        #[arg(long = "from-continent", value_delimiter = ',')]
        from_continents: Vec<ContinentCode>,
        #[arg(long = "to-code", value_delimiter = ',')]
        to_codes: Vec<String>,
        #[arg(long = "to-country", value_delimiter = ',')]
        to_countries: Vec<String>,
        #[arg(long = "to-continent", value_delimiter = ',')]
        to_continents: Vec<ContinentCode>,
        /// Departure date keyword, e.g. "tomorrow" or "next_week"
        #[arg(long, allow_hyphen_values = true)]
        departing: Option<String>,
        /// Arrival date keyword
        #[arg(long, allow_hyphen_values = true)]
        arriving: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Resolve a date keyword such as "today+3d" or "friday"
    When { keyword: String },
    /// Show the effective configuration, or write the defaults
    Config {
        /// Write the default configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct AirportArgs {
    /// Airport codes (comma separated)
    #[arg(long = "code", value_delimiter = ',')]
    codes: Vec<String>,
    /// Territory codes (comma separated)
    #[arg(long = "country", value_delimiter = ',')]
    countries: Vec<String>,
    /// Continent codes: AF, AS, EU, NA, OC, SA
    #[arg(long = "continent", value_delimiter = ',')]
    continents: Vec<ContinentCode>,
    #[arg(long, allow_hyphen_values = true)]
    min_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    min_lon: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_lon: Option<f64>,
}

impl AirportArgs {
    fn hierarchy(&self) -> HierarchicalAirportSearchParams {
        hierarchy(&self.codes, &self.countries, &self.continents)
    }

    fn bounds(&self) -> LatLonBoundsParams {
        LatLonBoundsParams {
            max_latitude: self.max_lat,
            min_latitude: self.min_lat,
            max_longitude: self.max_lon,
            min_longitude: self.min_lon,
        }
    }
}

#[derive(Args)]
struct PagingArgs {
    #[arg(long)]
    page: Option<usize>,
    #[arg(long)]
    page_size: Option<usize>,
    /// Keep only the first N results
    #[arg(long)]
    first: Option<usize>,
    /// Keep only the last N results
    #[arg(long)]
    last: Option<usize>,
}

impl PagingArgs {
    fn params(&self) -> PagingParams {
        PagingParams {
            page_index: self.page.or(self.page_size.map(|_| 0)),
            page_size: self.page_size,
            items_from_beginning: self.first,
            items_from_end: self.last,
        }
    }
}

fn hierarchy(
    codes: &[String],
    countries: &[String],
    continents: &[ContinentCode],
) -> HierarchicalAirportSearchParams {
    let mut params = HierarchicalAirportSearchParams::default();
    if !codes.is_empty() {
        params = params.with_airport_codes(codes.iter().map(|c| c.to_uppercase()));
    }
    if !countries.is_empty() {
        params = params.with_country_codes(countries.iter().map(|c| c.to_uppercase()));
    }
    if !continents.is_empty() {
        params = params.with_continent_codes(continents.iter().copied());
    }
    params
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .build();
    // A second initialisation only fails if a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn parse_position(text: &str) -> Result<GeoPoint> {
    let (lat, lon) = text
        .split_once(',')
        .context("Position must look like LAT,LON")?;
    let point = GeoPoint::new(
        lat.trim().parse().context("Invalid latitude")?,
        lon.trim().parse().context("Invalid longitude")?,
    );
    Ok(point.validated()?)
}

fn date_range(
    keyword: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
    let Some(keyword) = keyword else {
        return Ok(None);
    };
    let parsed = DateKeywordParser::parse(keyword, now);
    parsed
        .bounds()
        .map(Some)
        .with_context(|| format!("Unrecognised date keyword '{}'", keyword))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let manager = match &cli.config {
        Some(path) => ConfigManager::at(path),
        None => ConfigManager::new(),
    };
    let mut config: EngineConfig = manager.load()?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }

    let source: Arc<dyn DocumentSource> = match &config.data_dir {
        Some(dir) => {
            log::info!("[CLI] Using data directory {:?}", dir);
            Arc::new(DirectorySource::new(dir))
        }
        None => Arc::new(EmbeddedSource),
    };

    match cli.command {
        Commands::Airports {
            filter,
            sort,
            paging,
        } => {
            let engine = Engine::from_config(source, &config);
            let mut params = AirportSearchParams::new(filter.hierarchy())
                .with_bounds(filter.bounds())
                .with_paging(paging.params());
            if let Some(sort) = sort {
                params = params.with_sort(SortSpec::<AirportSortField>::parse(&sort));
            }
            let results = engine.airports.search(&params)?;
            if cli.json {
                return print_json(&results);
            }
            println!(
                "{} airports match (page {}, size {})",
                results.total_count, results.page_index, results.page_size
            );
            for a in &results.airports {
                println!(
                    "{:<4} {:<32} {:<18} {:<3} {:>9.4} {:>10.4}",
                    a.code, a.name, a.city, a.country, a.lat_decimal, a.lon_decimal
                );
            }
        }
        Commands::Nearby {
            lat,
            lon,
            here,
            position,
            units,
            radius,
            max_results,
            filter,
            sort,
            paging,
        } => {
            let provider: Arc<dyn PositionProvider> = match position.as_deref() {
                Some(text) => Arc::new(FixedPositionProvider(parse_position(text)?)),
                None => Arc::new(NoPositionProvider),
            };
            let geolocator = Arc::new(Geolocator::with_config(provider, config.geolocation));
            let engine = Engine::new(source, geolocator, config.seeder.clone());

            let mut options = NearbyAirportOptions {
                center: lat.zip(lon).map(|(lat, lon)| GeoPoint::new(lat, lon)),
                use_current_location_if_available: here,
                ..NearbyAirportOptions::default()
            }
            .with_units(units)
            .with_hierarchy(filter.hierarchy())
            .with_bounds(filter.bounds())
            .with_paging(paging.params());
            if let Some(radius) = radius {
                options = options.with_radius(radius);
            }
            if let Some(max) = max_results {
                options = options.with_max_results(max);
            }
            if let Some(sort) = sort {
                options = options.with_sort(SortSpec::<NearbySortField>::parse(&sort));
            }

            let Some(results) = engine.nearby.find_nearby_airports(&options)? else {
                anyhow::bail!(
                    "No reference point: pass --lat/--lon, or --here with a known position"
                );
            };
            if cli.json {
                return print_json(&results);
            }
            println!("{} airports in range", results.total_count);
            for item in &results.airport_info_items {
                println!(
                    "{:<4} {:<32} {:>10.1} {:<14} {}",
                    item.airport.code,
                    item.airport.name,
                    item.distance,
                    item.units.as_str(),
                    item.match_reason.as_str()
                );
            }
        }
        Commands::Flights {
            from_codes,
            from_countries,
            from_continents,
            to_codes,
            to_countries,
            to_continents,
            departing,
            arriving,
            paging,
        } => {
            let engine = Engine::from_config(source, &config);
            let now = Utc::now();
            match engine.seeder.seed()? {
                SeedOutcome::Completed(report) => log::info!(
                    "[CLI] Seeded {} flights over {} days",
                    report.created,
                    report.days
                ),
                SeedOutcome::Skipped => {}
            }

            let departure = date_range(departing.as_deref(), now)?;
            let arrival = date_range(arriving.as_deref(), now)?;
            let params = FlightSearchParams::between(
                AirportFilter::new(hierarchy(&from_codes, &from_countries, &from_continents)),
                AirportFilter::new(hierarchy(&to_codes, &to_countries, &to_continents)),
            )
            .departing_between(departure.map(|r| r.0), departure.map(|r| r.1))
            .arriving_between(arrival.map(|r| r.0), arrival.map(|r| r.1))
            .with_paging(paging.params());

            engine.flights.refresh_statuses(now);
            let results = engine.flight_search.search_flights(&params)?;
            if cli.json {
                return print_json(&results);
            }
            println!("{} flights match", results.total_count);
            for f in &results.flights {
                println!(
                    "{} {:<4} -> {:<4} {} {:>7.0} km {:>4} min {}",
                    f.departure_time.format("%Y-%m-%d %H:%M"),
                    f.origin_airport_code,
                    f.destination_airport_code,
                    f.arrival_time.format("%Y-%m-%d %H:%M"),
                    f.distance_km,
                    f.duration_minutes,
                    f.status
                );
            }
        }
        Commands::When { keyword } => {
            let parsed = DateKeywordParser::parse(&keyword, Utc::now());
            if cli.json {
                return print_json(&parsed);
            }
            match parsed {
                ParsedDate::Invalid { raw } => anyhow::bail!("Unrecognised date keyword '{}'", raw),
                ParsedDate::Point { date, canonical, .. } => {
                    println!("{}  ({})", canonical, date.to_rfc3339())
                }
                ParsedDate::Range {
                    start,
                    end,
                    canonical,
                    ..
                } => println!("{}  ({} .. {})", canonical, start.to_rfc3339(), end.to_rfc3339()),
            }
        }
        Commands::Config { init } => {
            if init {
                manager.save(&EngineConfig::default())?;
                println!("Wrote default configuration to {}", manager.path().display());
            } else if cli.json {
                return print_json(&config);
            } else {
                println!("# {}", manager.path().display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
