use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::info;

use clash_merge::interfaces::merge_urls;
use clash_merge::models::AppState;
use clash_merge::settings::{init_settings, replace_settings};
use clash_merge::utils::split_url_list;
use clash_merge::web_handlers::interfaces;

/// Merge proxy subscriptions into a single Clash configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Subscription URLs to merge directly instead of starting the server
    #[arg(long, value_name = "URLS")]
    urls: Option<String>,

    /// Output file for the merged config (must be used with --urls)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    if args.urls.is_some() != args.output.is_some() {
        bail!("--urls and -o/--output must be used together");
    }

    let mut settings = (*init_settings(args.config.as_deref().unwrap_or(""))
        .context("failed to load settings")?)
    .clone();
    if let Some(address) = args.address {
        settings.listen_address = address;
    }
    if let Some(port) = args.port {
        settings.listen_port = port;
    }
    let settings = replace_settings(settings);

    let app_state =
        Arc::new(AppState::new(Arc::clone(&settings)).context("failed to initialise")?);

    if let (Some(urls), Some(output)) = (args.urls, args.output) {
        info!("Merging subscriptions into {}", output);
        let yaml = merge_urls(
            &split_url_list(&urls),
            &app_state.fetcher,
            &app_state.classifier,
            &app_state.registry,
            &settings,
        )
        .await?;
        std::fs::write(&output, yaml).with_context(|| format!("failed to write {}", output))?;
        info!("Successfully wrote merged config to {}", output);
        return Ok(());
    }

    let listen_address = settings.bind_address();
    info!("clash-merge starting on {}", listen_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&app_state)))
            .configure(interfaces::config)
    })
    .bind(&listen_address)
    .with_context(|| format!("failed to bind {}", listen_address))?
    .run()
    .await?;
    Ok(())
}
