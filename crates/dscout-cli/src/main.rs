mod scrape;
mod sync;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dscout")]
#[command(about = "Dealscout coupon pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a coupon page into CouponRecord JSON on stdout.
    Scrape {
        /// URL of the coupon page to scrape.
        url: String,
        /// Override site detection with an explicit site key.
        #[arg(long)]
        site: Option<String>,
    },
    /// Print the site key that matches a URL.
    Detect {
        url: String,
    },
    /// Run a full affiliate sync: stores, coupons, expiration sweep,
    /// derived stats.
    Sync,
    /// Deactivate expired coupons without running a full sync.
    Sweep,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = dscout_core::AppConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { url, site } => scrape::run(&config, &url, site.as_deref()).await,
        Commands::Detect { url } => {
            let site = dscout_scraper::detect_site(&url)
                .ok_or(dscout_scraper::ScrapeError::UnknownSite { url })?;
            println!("{}", site.key);
            Ok(())
        }
        Commands::Sync => sync::run(&config).await,
        Commands::Sweep => sync::sweep(&config).await,
    }
}
