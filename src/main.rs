use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cable_svg::api;
use cable_svg::models::AppConfig;
use cable_svg::server;

#[derive(Parser)]
#[command(name = "cable-svg")]
#[command(about = "Render cable process diagrams to SVG in headless Chromium")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render one process diagram directly to an SVG file (no server needed)
    Render {
        /// Process name (e.g. "WireDrawing"); overrides processName in --data
        #[arg(short, long)]
        process: Option<String>,

        /// JSON file with the full process payload
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output SVG file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "cable-svg API",
        description = "Render cable process diagrams to SVG",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_cable_structure),
    components(schemas(api::ProcessRequestBody, api::ErrorResponse)),
    tags(
        (name = "Rendering", description = "Process diagram rendering")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Render {
            process,
            data,
            output,
        }) => run_render_command(process, data, output).await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Load config from `CONFIG_FILE` (if set) and apply environment overrides.
fn load_config() -> anyhow::Result<AppConfig> {
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let config = AppConfig::load(config_file.as_deref())?.with_env_overrides()?;
    Ok(config)
}

/// Render a diagram through the same pipeline the server uses
async fn run_render_command(
    process: Option<String>,
    data: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cable_svg=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = load_config()?;

    let mut payload = match &data {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => serde_json::json!({}),
    };
    if let (Some(name), Some(obj)) = (process, payload.as_object_mut()) {
        obj.insert(
            api::PROCESS_NAME_FIELD.to_string(),
            serde_json::Value::String(name),
        );
    }

    let request = api::validate_payload(payload).map_err(|e| anyhow::anyhow!("{e}"))?;

    let state = server::create_app_state(&config);
    let svg = state
        .renderer
        .render(&request)
        .await
        .map_err(|e| anyhow::anyhow!("Render error: {e}"))?;

    match output {
        Some(path) => {
            std::fs::write(&path, svg.as_str())?;
            println!("Rendered {} ({} bytes)", path.display(), svg.as_str().len());
        }
        None => println!("{}", svg.as_str()),
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("cable-svg v{VERSION}");
    println!("Cable process diagram renderer\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR         = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE       = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    for var in ["RENDER_BASE_URL", "CHROME_EXECUTABLE"] {
        println!(
            "  {var:<17} = {}",
            std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
        );
    }

    println!("\nEffective Configuration:");
    match load_config() {
        Ok(config) => {
            println!("  Render URL:   {}", config.render.render_url());
            println!(
                "  Timeouts:     navigation {} ms, svg {} ms",
                config.render.navigation_timeout_ms, config.render.svg_timeout_ms
            );
            println!(
                "  Browser:      {}",
                config
                    .browser
                    .executable
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "autodetect".to_string())
            );
        }
        Err(e) => println!("  (invalid: {e})"),
    }

    println!("\nCommands:");
    println!("  cable-svg serve    Start the HTTP server");
    println!("  cable-svg render   Render a process diagram to an SVG file");
    println!("\nRun 'cable-svg --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cable_svg=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        render_url = %config.render.render_url(),
        navigation_timeout_ms = config.render.navigation_timeout_ms,
        svg_timeout_ms = config.render.svg_timeout_ms,
        "Render target configured"
    );

    // The browser itself is launched lazily by the first render request
    let state = server::create_app_state(&config);

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "cable-svg server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(%e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
