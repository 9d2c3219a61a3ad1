use clap::{Args, Parser, Subcommand};
use onde::config::{Config, LocationSource, DEFAULT_LANGUAGE, DEFAULT_NOMINATIM_URL};
use onde::location::{Coordinate, LocationOptions};
use onde::session::Session;
use std::time::Duration;

/// Onde: where am I?
///
/// Gets the current location, shows it on a map and looks up its address
/// through OpenStreetMap Nominatim.
///
/// Examples:
///   onde locate --auto
///   onde address --lat -23.5505 --lon -46.6333
///   onde serve --auto --port 8080
#[derive(Parser)]
#[command(name = "onde", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Acquire the current location and print it.
    Locate(SourceArgs),
    /// Acquire the current location, then print its address.
    Address(SourceArgs),
    /// Serve the map page and its API.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, short = 'p', default_value_t = 3000)]
        port: u16,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Auto-detect location via IP geolocation.
    #[arg(long, short = 'a', conflicts_with_all = ["lat", "lon"])]
    auto: bool,

    /// Latitude (-90 to 90) of a known fix.
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude (-180 to 180) of a known fix.
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Nominatim base URL.
    #[arg(long, default_value = DEFAULT_NOMINATIM_URL)]
    nominatim_url: String,

    /// Language requested for address names.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Seconds to wait for a location fix.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

impl SourceArgs {
    fn config(&self) -> Config {
        let source = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                let c = Coordinate::new(lat, lon);
                if !c.is_valid() {
                    eprintln!("Error: Invalid coordinates. Lat: -90..90, Lon: -180..180");
                    std::process::exit(1);
                }
                LocationSource::Fixed(c)
            }
            _ if self.auto => LocationSource::IpApi,
            _ => LocationSource::None,
        };

        Config {
            source,
            location: LocationOptions {
                timeout: Duration::from_secs(self.timeout_secs),
                ..LocationOptions::default()
            },
            nominatim_url: self.nominatim_url.clone(),
            language: self.language.clone(),
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Locate(args) => {
            let config = args.config();
            let session = Session::new();
            let result = config.acquirer().acquire_location(&session).await;
            println!("{}", session.location_region().html());
            if result.is_err() {
                std::process::exit(1);
            }
        }
        Command::Address(args) => {
            let config = args.config();
            let session = Session::new();
            let located = config.acquirer().acquire_location(&session).await;
            println!("{}", session.location_region().html());
            if located.is_err() {
                std::process::exit(1);
            }

            let resolved = config.resolver().resolve_address(&session).await;
            println!("{}", session.address_region().html());
            if resolved.is_err() {
                std::process::exit(1);
            }
        }
        Command::Serve { host, port, source } => {
            let config = source.config();
            if let Err(e) = onde::server::start(&host, port, &config).await {
                eprintln!("Error: Cannot serve on {}:{}: {}", host, port, e);
                std::process::exit(1);
            }
        }
    }
}
