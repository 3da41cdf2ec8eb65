//! Health check for the NATS responder.

use crate::metrics::NatsMetrics;

/// Health status of the NATS connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Healthy and connected.
    Healthy,
    /// Degraded but functional.
    Degraded { reason: String },
    /// Unhealthy and not connected.
    Unhealthy { reason: String },
}

impl HealthStatus {
    /// Check if the status is healthy.
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Check if the service is operational (healthy or degraded).
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded { .. } => "degraded",
            HealthStatus::Unhealthy { .. } => "unhealthy",
        }
    }
}

/// Health check result with details.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub connected: bool,
    pub disconnects: u64,
    pub requests_received: u64,
    pub requests_failed: u64,
    pub publish_failures: u64,
}

impl HealthCheck {
    /// Create a health check from metrics.
    pub fn from_metrics(metrics: &NatsMetrics) -> Self {
        let snapshot = metrics.snapshot();

        let status = if snapshot.connected {
            if snapshot.publish_failures > 0 {
                HealthStatus::Degraded {
                    reason: format!("{} reply publish failures recorded", snapshot.publish_failures),
                }
            } else {
                HealthStatus::Healthy
            }
        } else {
            HealthStatus::Unhealthy {
                reason: "Not connected to NATS".to_string(),
            }
        };

        Self {
            status,
            connected: snapshot.connected,
            disconnects: snapshot.disconnects,
            requests_received: snapshot.requests_received,
            requests_failed: snapshot.requests_failed,
            publish_failures: snapshot.publish_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_is_unhealthy() {
        let metrics = NatsMetrics::new();
        let health = HealthCheck::from_metrics(&metrics);
        assert!(!health.status.is_operational());
        assert_eq!(health.status.as_str(), "unhealthy");
    }

    #[test]
    fn test_publish_failures_degrade() {
        let metrics = NatsMetrics::new();
        metrics.set_connected(true);
        assert!(HealthCheck::from_metrics(&metrics).status.is_healthy());

        metrics.record_publish_failure();
        let health = HealthCheck::from_metrics(&metrics);
        assert!(health.status.is_operational());
        assert!(!health.status.is_healthy());
    }
}
