/// Client reconnection policy
///
/// Fixed interval, no backoff. Each attempt sleeps first, then dials. Retries
/// forever unless `max_attempts` is set.
use std::future::Future;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::errors::{RelayError, TransportError};
use crate::logger::{self, LogTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Sleep before every attempt
    pub interval: Duration,
    /// None retries forever
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.reconnect_interval_secs),
            max_attempts: config.max_reconnect_attempts,
        }
    }

    fn exhausted(&self, attempts: u32) -> bool {
        matches!(self.max_attempts, Some(max) if attempts >= max)
    }
}

/// Retry `connect` until it succeeds or the policy runs out of attempts
pub async fn reconnect<F, Fut, T>(policy: &ReconnectPolicy, mut connect: F) -> Result<T, RelayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempts = 0u32;

    loop {
        if policy.exhausted(attempts) {
            logger::error(
                LogTag::Client,
                &format!("Giving up after {} reconnect attempts", attempts),
            );
            return Err(RelayError::ReconnectExhausted { attempts });
        }

        tokio::time::sleep(policy.interval).await;
        attempts += 1;

        logger::info(
            LogTag::Client,
            &format!("Attempting to reconnect (attempt {})...", attempts),
        );

        match connect().await {
            Ok(transport) => {
                logger::info(
                    LogTag::Client,
                    &format!("Reconnected after {} attempt(s)", attempts),
                );
                return Ok(transport);
            }
            Err(e) => {
                logger::warning(
                    LogTag::Client,
                    &format!("Reconnect attempt {} failed: {}", attempts, e),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn refused() -> TransportError {
        TransportError::Connect {
            url: "ws://localhost:1/ws".to_string(),
            reason: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_policy_from_config() {
        let config = ClientConfig {
            reconnect_interval_secs: 2,
            max_reconnect_attempts: Some(4),
            ..ClientConfig::default()
        };
        let policy = ReconnectPolicy::from_config(&config);
        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.max_attempts, Some(4));

        assert_eq!(
            ReconnectPolicy::from_config(&ClientConfig::default()),
            ReconnectPolicy::default()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_before_each_attempt() {
        let policy = ReconnectPolicy::default();
        let start = Instant::now();
        let mut calls = 0u32;

        let result = reconnect(&policy, || {
            calls += 1;
            let call = calls;
            async move {
                if call < 3 {
                    Err(refused())
                } else {
                    Ok(call)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_still_waits_one_interval() {
        let policy = ReconnectPolicy {
            interval: Duration::from_millis(250),
            max_attempts: None,
        };
        let start = Instant::now();

        reconnect(&policy, || async { Ok::<_, TransportError>(()) })
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_policy_gives_up() {
        let policy = ReconnectPolicy {
            interval: Duration::from_secs(1),
            max_attempts: Some(3),
        };
        let start = Instant::now();
        let mut calls = 0u32;

        let err = reconnect(&policy, || {
            calls += 1;
            async { Err::<(), _>(refused()) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, RelayError::ReconnectExhausted { attempts: 3 }));
        assert_eq!(calls, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_fails_immediately() {
        let policy = ReconnectPolicy {
            interval: Duration::from_secs(5),
            max_attempts: Some(0),
        };
        let err = reconnect(&policy, || async { Ok::<_, TransportError>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::ReconnectExhausted { attempts: 0 }));
    }
}
