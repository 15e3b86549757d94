use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use medminder::api::{ApiClient, DoseRecorder, ReminderFeed};
use medminder::commands::{CommandRunner, Flow, HELP};
use medminder::core::Config;
use medminder::features::doses::DoseLogger;
use medminder::features::presenters::{ConsolePresenter, DesktopNotifier, Presenter};
use medminder::features::reminders::{
    DedupTracker, FiringWindow, ReminderPoller, SystemClock,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting medication reminder agent for {}", config.base_url);
    if config.session_cookie.is_none() {
        info!("MEDMINDER_SESSION_COOKIE not set - requests are sent without a session");
    }

    let client = Arc::new(ApiClient::new(&config)?);

    // Desktop notification permission is decided once, up front
    let notifier = if config.desktop_notifications {
        DesktopNotifier::new()
    } else {
        info!("Desktop notifications disabled by configuration");
        DesktopNotifier::denied()
    };
    notifier.request_permission().await;

    let console = Arc::new(
        ConsolePresenter::new(std::io::stdout())
            .with_sound(config.sound)
            .with_desktop(notifier),
    );
    let presenter: Arc<dyn Presenter> = console.clone();
    let feed: Arc<dyn ReminderFeed> = client.clone();
    let recorder: Arc<dyn DoseRecorder> = client;

    let poller = Arc::new(
        ReminderPoller::new(
            feed.clone(),
            Arc::new(SystemClock),
            DedupTracker::new(config.dedup_ttl),
            presenter.clone(),
        )
        .with_window(FiringWindow::new(config.firing_window_end))
        .with_period(config.poll_interval),
    );
    let doses = Arc::new(DoseLogger::new(recorder, feed, presenter));
    let runner = CommandRunner::new(console, doses, poller.clone());

    // Start the reminder poller
    let poll_task = tokio::spawn(async move {
        poller.run().await;
    });

    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if runner.handle_line(&line).await == Flow::Exit {
                        break;
                    }
                }
                Ok(None) => {
                    // stdin closed: keep announcing reminders until interrupted
                    info!("Input closed - running until Ctrl-C");
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for Ctrl-C: {e}");
                    }
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {e}");
                    break;
                }
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for Ctrl-C: {e}");
                }
                break;
            }
        }
    }

    poll_task.abort();
    info!("Medication reminder agent stopped");

    Ok(())
}
