use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tinygkit::{init_logging, replay_to_channel, Config, Notification, ReplaySummary, TinyGController};
use tokio::sync::mpsc;

/// Replay captured TinyG/g2core output through the machine-state tracker
#[derive(Debug, Parser)]
#[command(name = "tinygkit", version)]
struct Args {
    /// Configuration file (.toml or .json); defaults to the user config if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    json: bool,

    /// File with one device line per line; reads stdin when omitted
    input: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => match Config::default_config_path() {
            Ok(path) if path.exists() => Config::load_from_file(&path)
                .with_context(|| format!("loading {}", path.display()))?,
            _ => Config::default(),
        },
    };

    if args.json {
        config.logging.json = true;
    }
    Ok(config)
}

fn open_input(input: Option<&PathBuf>) -> anyhow::Result<Box<dyn BufRead + Send>> {
    match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.logging)?;

    // A full channel blocks the replay until the logger catches up
    let (tx, mut rx) = mpsc::channel::<Notification>(config.tracker.notification_capacity);

    let logger = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            tracing::info!(kind = %notification.kind(), "{}", notification);
        }
    });

    let reader = open_input(args.input.as_ref())?;
    let mut controller = TinyGController::with_footer_policy(config.tracker.footer_policy);

    let (controller, lines) = tokio::task::spawn_blocking(move || {
        let lines = replay_to_channel(&mut controller, reader, &tx)?;
        Ok::<_, tinygkit::Error>((controller, lines))
    })
    .await??;

    let summary = ReplaySummary::new(&controller, lines);
    logger.await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
