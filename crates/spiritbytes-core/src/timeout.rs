// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call time budgets for external services.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::SpiritError;
use crate::types::AdapterType;

/// Runs `fut` under `duration`, mapping expiry to [`SpiritError::Timeout`].
pub async fn with_timeout<T, F>(
    service: AdapterType,
    duration: Duration,
    fut: F,
) -> Result<T, SpiritError>
where
    F: Future<Output = Result<T, SpiritError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(service = %service, ?duration, "external call timed out");
            Err(SpiritError::Timeout { service, duration })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expiry_maps_to_timeout_error() {
        let result: Result<(), _> = with_timeout(
            AdapterType::Completion,
            Duration::from_secs(5),
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
        )
        .await;
        match result {
            Err(SpiritError::Timeout { service, duration }) => {
                assert_eq!(service, AdapterType::Completion);
                assert_eq!(duration, Duration::from_secs(5));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let result = with_timeout(AdapterType::Inference, Duration::from_secs(5), async {
            Ok::<_, SpiritError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }
}
