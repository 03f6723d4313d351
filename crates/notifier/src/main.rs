mod config;
mod model;
mod notify;
mod store;
mod version;

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use tracing::info;

use crate::{
    config::{open_config, write_default_config},
    notify::{JobEvent, JobResponse},
    store::DataApiClient,
    version::short_version,
};

#[derive(Parser)]
#[command(version = short_version())]
struct Args {
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[arg(long)]
    init: bool,

    /// 起動イベントの JSON (例: '{"notificationType":"shopping-list"}')
    #[arg(long, conflicts_with = "event_file")]
    event: Option<String>,

    /// 起動イベント JSON を含むファイルのパス
    #[arg(long)]
    event_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if args.init {
        write_default_config(&args.config)?;
        info!(path = ?args.config, "Created default configuration");
        return Ok(());
    }

    tracing::info!(version = short_version(), "kc-notifier version");

    // 設定・イベントの不備もジョブ失敗と同じ 500 形式で報告する
    let response = match run(&args).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Notification job could not start");
            JobResponse::error(&format!("{e:#}"))
        }
    };
    println!("{}", serde_json::to_string(&response)?);

    // スケジューラ側が本文を読まなくても失敗を検知できるよう、終了コードにも反映する
    if response.status_code != 200 {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args) -> Result<JobResponse> {
    let config = open_config(&args.config).context("Failed to load configuration")?;
    let event = read_event(args)?;
    let store = DataApiClient::new(&config.store).context("Failed to create data API client")?;
    Ok(notify::execute(&event, &store).await)
}

fn read_event(args: &Args) -> Result<JobEvent> {
    let raw = match (&args.event, &args.event_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file: {}", path.display()))?,
        (None, None) => bail!("Either --event or --event-file is required"),
    };
    serde_json::from_str(&raw).context("Failed to parse job event")
}
