//! Checkwatch entrypoint: wait for a commit's checks and report failures.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use checkwatch::{
    CheckRunRepository, CheckWatcher, OctocrabCheckRunGateway, WaitReport, WatchConfig,
    WatchError, WebhookNotifier, logging,
};
use ortho_config::OrthoConfig;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(init_error) = logging::init()
        && writeln!(io::stderr().lock(), "failed to install logging: {init_error}").is_err()
    {
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(_report) => ExitCode::SUCCESS,
        Err(watch_error) => {
            error!(error = %watch_error, "watch failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<WaitReport, WatchError> {
    let settings = load_config()?.resolve()?;

    let gateway = OctocrabCheckRunGateway::for_token(&settings.token, &settings.locator)?;
    let notifier = WebhookNotifier::with_timeout(settings.webhook.as_str(), settings.webhook_timeout)?;
    let repository = CheckRunRepository::new(Arc::new(gateway), settings.locator.clone());

    let cancel = CancellationToken::new();
    let watcher = CheckWatcher::new(repository, Arc::new(notifier), settings.timing)
        .with_cancellation(cancel.clone());
    let watchdog = spawn_watchdog(cancel, settings.overall_timeout);

    let result = watcher
        .wait_for_checks(&settings.commit_sha, &settings.required_checks)
        .await;
    watchdog.abort();
    result
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`WatchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<WatchConfig, WatchError> {
    WatchConfig::load().map_err(|load_error| WatchError::Configuration {
        message: load_error.to_string(),
    })
}

/// Cancels the watch on Ctrl-C or once `overall_timeout` elapses.
fn spawn_watchdog(cancel: CancellationToken, overall_timeout: Option<Duration>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let deadline = async {
            match overall_timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(signal_error) = signal {
                    warn!(error = %signal_error, "cannot listen for Ctrl-C");
                    (&mut deadline).await;
                    warn!("overall timeout elapsed; cancelling watch");
                } else {
                    warn!("interrupted; cancelling watch");
                }
            }
            () = &mut deadline => warn!("overall timeout elapsed; cancelling watch"),
        }
        cancel.cancel();
    })
}
