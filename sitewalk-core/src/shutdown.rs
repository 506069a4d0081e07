//! Interrupt listening and exit status policy.

use sitewalk_scanner::{CrawlOutcome, ScanError};
use tracing::warn;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;

/// Resolves with the signal name once SIGINT or SIGTERM arrives.
///
/// If the handlers cannot be installed the future never resolves, and the run
/// can only end by completing.
#[cfg(unix)]
pub async fn interrupt_signal() -> String {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut sigint, mut sigterm) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Failed to install signal handlers: {}", e);
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sigint.recv() => "SIGINT".to_string(),
        _ = sigterm.recv() => "SIGTERM".to_string(),
    }
}

#[cfg(not(unix))]
pub async fn interrupt_signal() -> String {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "Ctrl-C".to_string(),
        Err(e) => {
            warn!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending().await
        }
    }
}

/// Process exit status for the result of a run.
pub fn exit_code(result: Result<&CrawlOutcome, &ScanError>) -> i32 {
    match result {
        Ok(CrawlOutcome::Completed(_)) => EXIT_OK,
        Ok(CrawlOutcome::Interrupted { .. }) => EXIT_FAILURE,
        Err(e) if e.is_config_error() => EXIT_CONFIG,
        Err(_) => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewalk_scanner::SiteMap;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Ok(&CrawlOutcome::Completed(SiteMap::new()))), EXIT_OK);
        assert_eq!(
            exit_code(Ok(&CrawlOutcome::Interrupted {
                site_map: SiteMap::new(),
                signal: "SIGTERM".to_string(),
            })),
            EXIT_FAILURE
        );
        assert_eq!(exit_code(Err(&ScanError::MissingUrl)), EXIT_CONFIG);
        assert_eq!(
            exit_code(Err(&ScanError::MalformedUrl("aaa.com".to_string()))),
            EXIT_CONFIG
        );
        assert_eq!(exit_code(Err(&ScanError::InvalidTarget)), EXIT_FAILURE);
    }
}
