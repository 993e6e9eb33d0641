mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use funding_finder::config::{LoggingSettings, Settings};
use funding_finder::{render, FormController, MatchingClient, ViewState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, FindArgs};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&settings.logging);

    if let Err(err) = run(cli, settings).await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Settings::load().context("failed to load configuration")?,
    };

    Ok(settings.with_backend_url(cli.backend_url.clone()))
}

fn init_tracing(logging: &LoggingSettings) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "json" => subscriber.json().init(),
        "pretty" => subscriber.pretty().init(),
        _ => subscriber.compact().init(),
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let client = MatchingClient::from_settings(&settings.backend)
        .context("failed to build HTTP client")?;

    info!("Using matching service at {}", client.base_url());

    match cli.command {
        Commands::Find(args) => find(FormController::new(client), args).await,
        Commands::Interactive => interactive(FormController::new(client)).await,
        Commands::Check => check(&client).await,
    }
}

/// Run one submission and print the loading and settled views
///
/// The loading frame goes to stderr so stdout carries only the result.
async fn submit_and_render(controller: &FormController) -> Result<ViewState> {
    let input = controller.begin_submit()?;
    eprint!("{}", render(&controller.view()));

    let outcome = controller.client().find_matches(&input).await;
    Ok(controller.settle(outcome))
}

async fn find(controller: FormController, args: FindArgs) -> Result<()> {
    controller.set_description(args.description);
    controller.set_sector(args.sector);
    controller.set_region(args.region);

    let view = submit_and_render(&controller).await?;

    match (view.data(), args.json) {
        (Some(data), true) => println!("{}", serde_json::to_string_pretty(data)?),
        _ => print!("{}", render(&view)),
    }

    if let Some(message) = view.error() {
        bail!("{}", message);
    }

    Ok(())
}

async fn interactive(controller: FormController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let Some(description) = prompt(&mut lines, &mut stdout, "Project description: ").await? else {
            break;
        };
        if description.is_empty() {
            break;
        }
        let sector = prompt(&mut lines, &mut stdout, "Sector (optional): ").await?.unwrap_or_default();
        let region = prompt(&mut lines, &mut stdout, "Region (optional): ").await?.unwrap_or_default();

        controller.set_description(description);
        controller.set_sector(sector);
        controller.set_region(region);

        let view = submit_and_render(&controller).await?;
        println!("{}", render(&view));
    }

    Ok(())
}

async fn prompt<R, W>(lines: &mut Lines<R>, out: &mut W, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    out.write_all(label.as_bytes()).await?;
    out.flush().await?;
    Ok(lines.next_line().await?)
}

async fn check(client: &MatchingClient) -> Result<()> {
    let status = client
        .check_backend()
        .await
        .with_context(|| format!("backend at {} is unreachable", client.base_url()))?;

    println!("GET {} -> {}", status.url, status.status_code);
    if !status.body.is_empty() {
        println!("{}", status.body);
    }

    Ok(())
}
