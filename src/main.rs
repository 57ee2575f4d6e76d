use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use edgedriver_fetch::config::{self, FetchConfig, MAX_VERSION_COUNT};
use edgedriver_fetch::driver::cache::DriverCache;
use edgedriver_fetch::driver::download::DriverDownloader;
use edgedriver_fetch::driver::fetcher::DriverFetcher;
use edgedriver_fetch::driver::platform::Platform;
use edgedriver_fetch::logging::init_logging;
use edgedriver_fetch::version::registries::EdgeDriverRegistry;
use edgedriver_fetch::version::resolver::resolve_recent_versions;

#[derive(Parser)]
#[command(name = "edgedriver-fetch")]
#[command(version, about = "Download recent Microsoft Edge WebDriver releases")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Release server base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Number of versions to fetch (latest plus previous major versions)
    #[arg(
        short = 'n',
        long,
        global = true,
        value_parser = clap::value_parser!(u16).range(1..=MAX_VERSION_COUNT as i64)
    )]
    count: Option<u16>,

    /// Folder the drivers are copied into
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Target platform (win64, win32, arm64, mac64, mac64_m1, linux64)
    #[arg(long, global = true)]
    platform: Option<Platform>,

    /// Always download, bypassing the local driver cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Download the drivers into the output folder (default)
    Download,
    /// Print the resolved versions without downloading
    Versions,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<FetchConfig> {
        let mut config = match &self.config {
            Some(path) => FetchConfig::from_file(path)?,
            None => FetchConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(count) = self.count {
            config.count = usize::from(count);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.platform.is_some() {
            config.platform = self.platform;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&config::log_path());
    let config = cli.load_config()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command.unwrap_or(Command::Download) {
        Command::Download => runtime.block_on(download(&config)),
        Command::Versions => runtime.block_on(print_versions(&config)),
    }
}

async fn print_versions(config: &FetchConfig) -> anyhow::Result<()> {
    let registry = EdgeDriverRegistry::new(&config.base_url);
    for version in resolve_recent_versions(&registry, config.count).await {
        println!("{}", version);
    }
    Ok(())
}

async fn download(config: &FetchConfig) -> anyhow::Result<()> {
    let registry = EdgeDriverRegistry::new(&config.base_url);
    let versions = resolve_recent_versions(&registry, config.count).await;

    if versions.is_empty() {
        error!("Could not retrieve driver versions, nothing to download");
        return Ok(());
    }

    info!("Fetching versions: {}", versions.join(", "));

    let mut fetcher = DriverFetcher::new(
        DriverDownloader::new(&config.base_url),
        config.platform(),
        &config.output_dir,
    );

    if config.cache.enabled {
        match open_cache() {
            Ok(cache) => fetcher = fetcher.with_cache(cache, &config::drivers_dir()),
            Err(e) => warn!("Driver cache unavailable, downloading directly: {}", e),
        }
    }

    let report = fetcher.fetch_all(&versions).await?;

    info!(
        "Download complete: {} stored, {} failed",
        report.stored.len(),
        report.failed.len()
    );

    Ok(())
}

fn open_cache() -> anyhow::Result<DriverCache> {
    std::fs::create_dir_all(config::data_dir())?;
    Ok(DriverCache::new(&config::db_path())?)
}
