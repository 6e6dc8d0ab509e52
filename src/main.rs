use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use umkm_studio::client::view::{render_brand, render_pricing, render_state, LOADING_MESSAGE};
use umkm_studio::client::{DispatchOutcome, Dispatcher, ImageEncoder, SkipReason, ViewState};
use umkm_studio::config::Config;
use umkm_studio::server;

#[derive(Debug, Parser)]
#[command(name = "umkm-studio")]
#[command(about = "Pricing and branding insights for craft products")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ask for a price range and market insight for a product photo.
    Pricing {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// Material, technique, size...
        #[arg(long, default_value = "")]
        description: String,
        #[command(flatten)]
        output: ClientArgs,
    },
    /// Ask for brand names, taglines and a palette for a product photo.
    Brand {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// The maker's story.
        #[arg(long, default_value = "")]
        story: String,
        #[command(flatten)]
        output: ClientArgs,
    },
}

#[derive(Debug, clap::Args)]
struct ClientArgs {
    /// Server base URL (defaults to UMKM_SERVER_URL).
    #[arg(long)]
    server: Option<String>,
    /// Print the JSON result instead of formatted text.
    #[arg(long)]
    json: bool,
}

/// Encode the photo through the same callback contract the uploader uses.
async fn encode_image(path: &Path) -> Result<Option<String>> {
    let mut selected = String::new();
    let accepted = ImageEncoder::new(|b64: &str| selected = b64.to_string())
        .select_file(path)
        .await?;
    Ok(accepted.then_some(selected))
}

fn finish<T: serde::Serialize>(
    outcome: DispatchOutcome<T>,
    json: bool,
    render: fn(&T) -> String,
) -> Result<bool> {
    if let DispatchOutcome::Skipped(reason) = &outcome {
        match reason {
            SkipReason::NoImage => error!("The selected image is empty"),
            SkipReason::Busy => error!("A request is already in progress"),
        }
        return Ok(false);
    }

    let state = ViewState::Loading.apply(outcome);
    match &state {
        ViewState::Success(output) if json => {
            println!("{}", serde_json::to_string_pretty(output)?);
        }
        ViewState::Error(message) => eprintln!("{}", message),
        _ => print!("{}", render_state(&state, render)),
    }
    Ok(!matches!(state, ViewState::Error(_)))
}

async fn run(args: CliArgs) -> Result<bool> {
    let mut config = Config::from_env()?;

    match args.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            server::serve(config).await?;
            Ok(true)
        }
        Command::Pricing {
            image,
            description,
            output,
        } => {
            let Some(encoded) = encode_image(&image).await? else {
                error!("{} is not an image file", image.display());
                return Ok(false);
            };
            let dispatcher = Dispatcher::new(output.server.unwrap_or(config.server_url));
            eprintln!("{}", LOADING_MESSAGE);
            let outcome = dispatcher.analyze_pricing(&encoded, &description).await;
            finish(outcome, output.json, render_pricing)
        }
        Command::Brand {
            image,
            story,
            output,
        } => {
            let Some(encoded) = encode_image(&image).await? else {
                error!("{} is not an image file", image.display());
                return Ok(false);
            };
            let dispatcher = Dispatcher::new(output.server.unwrap_or(config.server_url));
            eprintln!("{}", LOADING_MESSAGE);
            let outcome = dispatcher.generate_brand(&encoded, &story).await;
            finish(outcome, output.json, render_brand)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "umkm_studio=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Failed: {}", e);
            std::process::exit(1);
        }
    }
}
