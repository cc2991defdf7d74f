// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `spiritbytes doctor`: configuration, database and adapter health.

use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use spiritbytes_config::SpiritConfig;
use spiritbytes_core::{HealthStatus, PluginAdapter, SpiritError};
use spiritbytes_emotion::build_transport;
use spiritbytes_openai::OpenAiProvider;
use spiritbytes_storage::{Database, HttpAttributeStore};

use crate::render::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

pub async fn run_doctor(config: &SpiritConfig, out: &Output) -> Result<(), SpiritError> {
    let checks: Vec<BoxFuture<'_, CheckResult>> = vec![
        check_database(config).boxed(),
        check_completion(config).boxed(),
        check_inference(config).boxed(),
        check_identity(config).boxed(),
    ];
    let mut results = vec![CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!("valid (model {})", config.completion.model),
        Instant::now(),
    )];
    results.extend(join_all(checks).await);

    out.heading("spiritbytes doctor");
    let mut issues = 0;
    for result in &results {
        let line = format!(
            "{:<14} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
        match result.status {
            CheckStatus::Pass => out.success(&line),
            CheckStatus::Warn | CheckStatus::Fail => {
                issues += 1;
                out.warn(&line);
            }
        }
    }
    println!();

    let failed = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    if issues == 0 {
        out.line("All checks passed.");
    } else {
        let word = if issues == 1 { "issue" } else { "issues" };
        out.line(&format!("{issues} {word} found."));
    }
    if failed > 0 {
        return Err(SpiritError::Internal(format!("{failed} check(s) failed")));
    }
    Ok(())
}

async fn check_database(config: &SpiritConfig) -> CheckResult {
    let start = Instant::now();
    match Database::open(&config.storage).await {
        Ok(db) => CheckResult::new("Database", CheckStatus::Pass, db.path().to_string(), start),
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_completion(config: &SpiritConfig) -> CheckResult {
    let start = Instant::now();
    match OpenAiProvider::new(config) {
        Ok(provider) => adapter_result("Completion", &provider, start).await,
        Err(e) => CheckResult::new("Completion", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_inference(config: &SpiritConfig) -> CheckResult {
    let start = Instant::now();
    match build_transport(config) {
        Ok(Some(transport)) => adapter_result("Inference", transport.as_ref(), start).await,
        Ok(None) => CheckResult::new(
            "Inference",
            CheckStatus::Warn,
            "no endpoint configured, photo analysis disabled",
            start,
        ),
        Err(e) => CheckResult::new("Inference", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_identity(config: &SpiritConfig) -> CheckResult {
    let start = Instant::now();
    match HttpAttributeStore::from_config(&config.identity) {
        Ok(Some(store)) => adapter_result("Identity", &store, start).await,
        Ok(None) => CheckResult::new(
            "Identity",
            CheckStatus::Warn,
            "not configured, preferences stay on this device",
            start,
        ),
        Err(e) => CheckResult::new("Identity", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn adapter_result<A: PluginAdapter + ?Sized>(
    name: &'static str,
    adapter: &A,
    start: Instant,
) -> CheckResult {
    let (status, message) = match adapter.health_check().await {
        Ok(health) => classify(adapter.name(), health),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult::new(name, status, message, start)
}

fn classify(adapter: &str, health: HealthStatus) -> (CheckStatus, String) {
    match health {
        HealthStatus::Healthy => (CheckStatus::Pass, format!("{adapter} healthy")),
        HealthStatus::Degraded(reason) => (CheckStatus::Warn, format!("{adapter}: {reason}")),
        HealthStatus::Unhealthy(reason) => (CheckStatus::Fail, format!("{adapter}: {reason}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_maps_to_check_status() {
        assert_eq!(classify("openai", HealthStatus::Healthy).0, CheckStatus::Pass);
        let (status, message) = classify("blob-http", HealthStatus::Degraded("slow".into()));
        assert_eq!(status, CheckStatus::Warn);
        assert_eq!(message, "blob-http: slow");
        assert_eq!(
            classify("identity-http", HealthStatus::Unhealthy("401".into())).0,
            CheckStatus::Fail
        );
    }

    #[tokio::test]
    async fn unconfigured_services_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SpiritConfig::default();
        config.storage.database_path = dir.path().join("doctor.db").display().to_string();

        assert_eq!(check_database(&config).await.status, CheckStatus::Pass);
        assert_eq!(check_inference(&config).await.status, CheckStatus::Warn);
        assert_eq!(check_identity(&config).await.status, CheckStatus::Warn);
    }
}
