use aqi_insights::openaq::OpenAqClient;
use aqi_insights::{AirQualityOrchestrator, CityMetric, InsightConfig, Trend};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum View {
    All,
    Insight,
    Forecast,
    Health,
}

#[derive(Parser, Debug)]
#[command(name = "aqi-insights")]
#[command(about = "AI insight, 72-hour forecast and health impact for a city's air quality")]
struct Args {
    /// City name
    #[arg(short, long)]
    city: String,

    /// Current AQI (ignored with --live when OpenAQ has a reading)
    #[arg(short, long, default_value_t = 50)]
    aqi: u32,

    /// rising, falling or stable
    #[arg(short, long, default_value = "stable")]
    trend: Trend,

    /// Recent AQI samples, oldest first (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    samples: Vec<u32>,

    /// Fetch the current AQI from OpenAQ (needs OPENAQ_API_KEY)
    #[arg(long)]
    live: bool,

    #[arg(long, value_enum, default_value_t = View::All)]
    view: View,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = InsightConfig::from_env();

    let mut aqi = args.aqi;
    if args.live {
        match config.openaq_api_key.clone() {
            Some(key) => match OpenAqClient::new(key).latest_reading(&args.city).await {
                Ok(Some(reading)) => {
                    tracing::info!(
                        "OpenAQ: {} pm25={} aqi={} ({})",
                        args.city,
                        reading.pm25,
                        reading.aqi,
                        reading.last_updated
                    );
                    aqi = reading.aqi;
                }
                Ok(None) => tracing::warn!("OpenAQ has no PM2.5 reading for {}", args.city),
                Err(e) => tracing::warn!("OpenAQ lookup failed: {}", e),
            },
            None => tracing::warn!("--live requested but OPENAQ_API_KEY is not set"),
        }
    }

    let samples = if args.samples.is_empty() { vec![aqi] } else { args.samples };
    let metric = CityMetric::new(args.city, aqi, args.trend).with_samples(samples);
    let orchestrator = AirQualityOrchestrator::new(&config);

    let report = orchestrator.get_all(&metric).await;
    let output = match args.view {
        View::All => serde_json::to_string_pretty(&report)?,
        View::Insight => serde_json::to_string_pretty(&report.insight)?,
        View::Forecast => serde_json::to_string_pretty(&report.forecast)?,
        View::Health => serde_json::to_string_pretty(&report.health_impact)?,
    };
    tracing::debug!("Metrics: {:?}", orchestrator.metrics());

    println!("{}", output);
    Ok(())
}
