//! Service layer: record orchestration.
//!
//! [`RecordService`] validates incoming records, persists them through the
//! [`super::persistence::RecordStore`] and announces creations through the
//! [`super::domain::Hub`].

pub mod record_service;

pub use record_service::RecordService;
