use clap::Parser;
use moodlog_adaptor_web::{WebUiConfig, WebUiServer};
use moodlog_core::utils::logger::init_logging;
use moodlog_core::{load_env, MoodlogConfig, ReplyBank};
use moodlog_provider_inference::{build_registry, InferenceConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "run-moodlog", about = "Retro terminal mood journal")]
struct Cli {
    /// Bind host for the web UI
    #[arg(long, env = "MOODLOG_HOST")]
    host: Option<String>,

    /// Bind port for the web UI
    #[arg(long, env = "MOODLOG_PORT")]
    port: Option<u16>,

    /// Reply bank JSON file
    #[arg(long, env = "MOODLOG_REPLIES_FILE")]
    replies: Option<PathBuf>,

    #[arg(long, env = "MOODLOG_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> moodlog_core::Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(run())
}

async fn run() -> moodlog_core::Result<()> {
    // .env first so clap's env fallbacks see it
    let env_loaded = load_env();
    let cli = Cli::parse();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &cli.log_level);
    }
    init_logging();
    env_loaded?;

    let mut config = MoodlogConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(replies) = cli.replies {
        config.replies_file = replies;
    }

    tracing::info!("BOOTING SYSTEM...");
    let registry = build_registry(&InferenceConfig::from_env())?;
    let replies = ReplyBank::load(&config.replies_file);

    let server = WebUiServer::new(WebUiConfig::from(&config), registry, replies)?;
    server.start().await
}
