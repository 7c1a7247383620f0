use std::path::PathBuf;
use std::sync::Arc;

use ai_face_reader::{
    gemini::GeminiClient,
    offline_cache::CacheManifest,
    render,
    server::{self, AppState},
    AnalysisClient, AnalysisMode, Config, Locale, ProxyService, Session,
};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ai-face-reader", version, about = "AI face reading proxy and client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web page and the model proxy
    Serve {
        /// Address to bind, overrides FACE_READER_BIND
        #[arg(long)]
        bind: Option<String>,
        /// Locale for user-facing messages (ko, en)
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Analyze a photo through a running proxy
    Analyze {
        /// Path to a PNG, JPEG or WebP photo
        image: PathBuf,
        /// physiognomy, celebrity or soulmate
        #[arg(long, default_value = "physiognomy")]
        mode: AnalysisMode,
        /// Proxy origin
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        locale: Option<Locale>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ai_face_reader=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Command::Serve { bind, locale } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(locale) = locale {
                config.locale = locale;
            }
            serve(config).await
        }
        Command::Analyze {
            image,
            mode,
            server,
            locale,
        } => analyze(image, mode, &server, locale.unwrap_or(config.locale)).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let api_key = config.require_api_key()?;
    let model = Arc::new(GeminiClient::new(&config.api_base, &config.model, api_key));
    let proxy = ProxyService::new(model, config.locale, &config.nationality);
    let state = Arc::new(AppState::new(proxy, &CacheManifest::default())?);
    let app = server::router(state, config.body_limit);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    info!("🚀 Server running on http://{}", listener.local_addr()?);
    info!(model = %config.model, locale = %config.locale, "📸 Open in your browser to start reading faces!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn analyze(
    image: PathBuf,
    mode: AnalysisMode,
    server: &str,
    locale: Locale,
) -> anyhow::Result<()> {
    let client = AnalysisClient::new(server, locale);
    let uploaded = client.load_image(&image).await?;

    let mut session = Session::new(locale);
    session.set_active(mode);
    session.select_image(uploaded);

    let view = session.view();
    println!("{}\n{}\n", view.header_title, view.header_subtitle);
    println!("{}", locale.loading());

    let state = session.run(mode, &client).await;
    println!("{}", render::render_state(state, &view, locale));

    if state.error().is_some() {
        bail!("{mode} analysis failed");
    }
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
