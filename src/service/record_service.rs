//! Record service: persists records and announces creations to listeners.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{
    Alert, Collection, ElementPatch, Envelope, EventType, Hub, Metric, NetworkElement, NewAlert,
    NewElement, NewMetric, Record, RecordId,
};
use crate::error::GatewayError;
use crate::persistence::models::to_body;
use crate::persistence::{Filter, RecordStore, Sort};

/// Default number of metric samples returned per element.
pub const DEFAULT_METRIC_LIMIT: usize = 100;

/// Upper bound for the metric sample limit.
pub const MAX_METRIC_LIMIT: usize = 1_000;

/// Orchestration layer for all record operations.
///
/// Every create follows the same pattern: validate → stamp server time →
/// insert → wrap the stored record in an envelope → broadcast. Delivery
/// problems stay inside the hub; a create succeeds once the insert did.
#[derive(Debug, Clone)]
pub struct RecordService {
    store: RecordStore,
    hub: Hub,
}

impl RecordService {
    /// Creates a new `RecordService`.
    #[must_use]
    pub fn new(store: RecordStore, hub: Hub) -> Self {
        Self { store, hub }
    }

    /// Returns a reference to the inner [`Hub`].
    #[must_use]
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Returns a reference to the inner [`RecordStore`].
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // ── Network elements ────────────────────────────────────────────────

    /// Registers a new network element and broadcasts `element_created`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on blank required fields or
    /// a store error.
    pub async fn create_element(
        &self,
        draft: NewElement,
    ) -> Result<Record<NetworkElement>, GatewayError> {
        let element = draft.into_element(Utc::now())?;
        self.insert_and_announce(Collection::NetworkElements, EventType::ElementCreated, element)
            .await
    }

    /// Lists elements, optionally only those with the given status. A blank
    /// status means no filter.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure.
    pub async fn list_elements(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<Record<NetworkElement>>, GatewayError> {
        let filter = match status.filter(|status| !status.trim().is_empty()) {
            Some(status) => Filter::all().eq("status", status),
            None => Filter::all(),
        };
        self.find(Collection::NetworkElements, &filter, None, None)
            .await
    }

    /// Fetches one element.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ElementNotFound`] if no element has `id`.
    pub async fn get_element(&self, id: RecordId) -> Result<Record<NetworkElement>, GatewayError> {
        self.store
            .find_one(Collection::NetworkElements, id)
            .await?
            .ok_or(GatewayError::ElementNotFound(id))?
            .into_record()
    }

    /// Applies the present fields of `patch` to an element.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ElementNotFound`] if no element has `id`,
    /// [`GatewayError::InvalidRequest`] on blank required fields.
    pub async fn update_element(
        &self,
        id: RecordId,
        patch: &ElementPatch,
    ) -> Result<(), GatewayError> {
        patch.validate()?;
        let matched = self
            .store
            .update(Collection::NetworkElements, id, to_body(patch)?)
            .await?;
        if matched == 0 {
            return Err(GatewayError::ElementNotFound(id));
        }
        tracing::info!(record_id = %id, "element updated");
        Ok(())
    }

    /// Deletes an element.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ElementNotFound`] if no element has `id`.
    pub async fn delete_element(&self, id: RecordId) -> Result<(), GatewayError> {
        let deleted = self.store.delete(Collection::NetworkElements, id).await?;
        if deleted == 0 {
            return Err(GatewayError::ElementNotFound(id));
        }
        tracing::info!(record_id = %id, "element deleted");
        Ok(())
    }

    // ── Metrics ─────────────────────────────────────────────────────────

    /// Records a metric sample and broadcasts `metric_update`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on blank required fields or
    /// a store error.
    pub async fn record_metric(&self, draft: NewMetric) -> Result<Record<Metric>, GatewayError> {
        let metric = draft.into_metric(Utc::now())?;
        self.insert_and_announce(Collection::Metrics, EventType::MetricUpdate, metric)
            .await
    }

    /// Returns the newest `limit` samples of an element, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure.
    pub async fn metrics_for_element(
        &self,
        element_id: &str,
        limit: usize,
    ) -> Result<Vec<Record<Metric>>, GatewayError> {
        self.find(
            Collection::Metrics,
            &Filter::all().eq("element_id", element_id),
            Some(&Sort::descending("timestamp")),
            Some(limit.clamp(1, MAX_METRIC_LIMIT)),
        )
        .await
    }

    // ── Alerts ──────────────────────────────────────────────────────────

    /// Raises an alert and broadcasts `alert_created`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on blank required fields or
    /// a store error.
    pub async fn raise_alert(&self, draft: NewAlert) -> Result<Record<Alert>, GatewayError> {
        let alert = draft.into_alert(Utc::now())?;
        self.insert_and_announce(Collection::Alerts, EventType::AlertCreated, alert)
            .await
    }

    /// Lists alerts newest first, optionally filtered by resolution state.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure.
    pub async fn list_alerts(
        &self,
        resolved: Option<bool>,
    ) -> Result<Vec<Record<Alert>>, GatewayError> {
        let filter = match resolved {
            Some(resolved) => Filter::all().eq("resolved", resolved),
            None => Filter::all(),
        };
        self.find(
            Collection::Alerts,
            &filter,
            Some(&Sort::descending("created_at")),
            None,
        )
        .await
    }

    /// Marks an alert resolved and stamps `resolved_at`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AlertNotFound`] if no alert has `id`.
    pub async fn resolve_alert(&self, id: RecordId) -> Result<(), GatewayError> {
        let mut patch = Map::new();
        patch.insert("resolved".to_string(), Value::Bool(true));
        patch.insert(
            "resolved_at".to_string(),
            Value::String(crate::domain::timestamp::format(&Utc::now())),
        );
        let matched = self.store.update(Collection::Alerts, id, patch).await?;
        if matched == 0 {
            return Err(GatewayError::AlertNotFound(id));
        }
        tracing::info!(record_id = %id, "alert resolved");
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    async fn insert_and_announce<T: Serialize>(
        &self,
        collection: Collection,
        event_type: EventType,
        fields: T,
    ) -> Result<Record<T>, GatewayError> {
        let id = self.store.insert(collection, to_body(&fields)?).await?;
        let record = Record { id, fields };

        let envelope = Envelope::from_record(event_type, &record)?;
        let report = self.hub.broadcast(envelope).await;

        tracing::info!(
            record_id = %id,
            collection = collection.as_str(),
            listeners = report.delivered,
            "record created"
        );
        Ok(record)
    }

    async fn find<T: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
        limit: Option<usize>,
    ) -> Result<Vec<Record<T>>, GatewayError> {
        self.store
            .find(collection, filter, sort, limit)
            .await?
            .into_iter()
            .map(|doc| doc.into_record())
            .collect()
    }
}
