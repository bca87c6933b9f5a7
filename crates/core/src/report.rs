//! Alert reports created from a confirmed date/time.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid alert report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report file: {0}")]
    Io(#[from] std::io::Error),
}

/// The payload a client submits. `id` is assigned by the store; unknown
/// keys, a client-sent `id` included, are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlertReport {
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewAlertReport {
    pub fn new(event_date: DateTime<Utc>) -> Self {
        Self {
            event_date,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse a submitted payload. `eventDate` is required.
    pub fn from_json(data: &[u8]) -> Result<Self, ReportError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// A stored report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub id: Uuid,
    pub event_date: DateTime<Utc>,
    /// Always present in JSON; `null` when the client sent none.
    pub description: Option<String>,
}

pub trait ReportStore {
    fn create(&mut self, report: NewAlertReport) -> AlertReport;

    /// Every report, oldest first.
    fn list(&self) -> Vec<AlertReport>;

    fn create_from_json(&mut self, data: &[u8]) -> Result<AlertReport, ReportError> {
        let report = NewAlertReport::from_json(data)?;
        Ok(self.create(report))
    }
}

/// Keeps reports in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemStore {
    reports: Vec<AlertReport>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<&AlertReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Write every report to `path` as a pretty JSON array.
    pub fn save_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_vec_pretty(&self.reports)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ReportStore for MemStore {
    fn create(&mut self, report: NewAlertReport) -> AlertReport {
        let report = AlertReport {
            id: Uuid::new_v4(),
            event_date: report.event_date,
            description: report.description,
        };
        info!(id = %report.id, event_date = %report.event_date, "alert report created");
        self.reports.push(report.clone());
        report
    }

    fn list(&self) -> Vec<AlertReport> {
        self.reports.clone()
    }
}
