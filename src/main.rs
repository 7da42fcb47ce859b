//! Pretty Timer - a count-up/countdown timer for the terminal
//!
//! This is the main entry point for the pretty-timer application.

use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::Context;
use tokio::io::BufReader;
use tracing::{info, warn};

use pretty_timer::{
    config::Config,
    services::{JsonSink, RenderSink, SystemClock, TerminalSink, TokioScheduler},
    tasks::edit_input_task,
    timer::{Timer, TimerEnv},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they do not interleave with the rendered time
    tracing_subscriber::fmt()
        .with_env_filter(format!("pretty_timer={}", config.log_level()))
        .with_writer(io::stderr)
        .init();

    let bell = config.bell;
    let timer_config = config
        .timer_config()
        .context("Invalid timer options")?
        .with_callback(move || {
            info!("Time up!");
            if bell {
                print!("\x07");
                if let Err(e) = io::stdout().flush() {
                    warn!("Failed to ring the terminal bell: {}", e);
                }
            }
        });

    info!("Starting pretty-timer v1.0.0");
    info!(
        "Configuration: seconds={}, duration={:?}, countdown={}, repeat={}, format={:?}, every={}ms",
        timer_config.seconds,
        timer_config.duration,
        timer_config.countdown,
        timer_config.repeat,
        timer_config.format,
        timer_config.update_frequency
    );

    let sink: Arc<dyn RenderSink> = if config.json {
        Arc::new(JsonSink)
    } else {
        Arc::new(TerminalSink)
    };
    let scheduler = TokioScheduler::current().context("No tokio runtime available")?;
    let env = TimerEnv::new(Arc::new(SystemClock), Arc::new(scheduler), sink);

    let timer = Timer::start(timer_config, env)?;

    if timer.is_editable() {
        let editor = timer.clone();
        tokio::spawn(async move {
            edit_input_task(editor, BufReader::new(tokio::io::stdin())).await;
        });
    }

    tokio::select! {
        _ = timer.stopped() => {
            info!("Timer finished");
        }
        result = shutdown_signal() => {
            result.context("Failed to install signal handlers")?;
            info!("Shutdown signal received");
            timer.stop();
        }
    }

    if !config.json {
        println!();
    }
    info!("Stopped at {} ({}s)", timer.display_text(), timer.total_seconds());
    Ok(())
}
