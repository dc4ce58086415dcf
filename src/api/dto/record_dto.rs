//! Query parameters of the record list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::service::record_service::{DEFAULT_METRIC_LIMIT, MAX_METRIC_LIMIT};

/// Query for `GET /api/elements`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ElementQuery {
    /// Only return elements with this status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Query for `GET /api/alerts`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AlertQuery {
    /// Only return resolved (`true`) or open (`false`) alerts.
    #[serde(default)]
    pub resolved: Option<bool>,
}

/// Query for `GET /api/metrics/{element_id}`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MetricQuery {
    /// Maximum number of samples (1–1000). Defaults to 100.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_METRIC_LIMIT
}

impl MetricQuery {
    /// Clamps `limit` to the allowed range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_METRIC_LIMIT),
        }
    }
}

impl Default for MetricQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(MetricQuery { limit: 0 }.clamped().limit, 1);
        assert_eq!(MetricQuery { limit: 50_000 }.clamped().limit, MAX_METRIC_LIMIT);
        assert_eq!(MetricQuery::default().clamped().limit, DEFAULT_METRIC_LIMIT);
    }
}
