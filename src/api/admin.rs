//! Admin usage reports

use super::de::nullable;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

/// Monthly usage report of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub year: i32,
    #[serde(deserialize_with = "nullable")]
    pub month: u32,
    #[serde(deserialize_with = "nullable")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    pub server_seconds: f64,
    #[serde(deserialize_with = "nullable")]
    pub closed: bool,
    #[serde(deserialize_with = "nullable")]
    pub account_id: String,
}

impl Report {
    /// Server usage in hours
    pub fn server_hours(&self) -> f64 {
        self.server_seconds / 3600.0
    }
}

impl Columns for Report {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("YEAR", "year"),
        Column::new("MONTH", "month"),
        Column::new("START TIME", "start_time"),
        Column::new("END TIME", "end_time"),
        Column::new("SERVER SECONDS", "server_seconds"),
        Column::new("CLOSED", "closed"),
        Column::new("ACCOUNT ID", "account_id"),
    ];
}

pub struct ReportService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> ReportService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_reports(&self) -> Result<Vec<Report>> {
        request::get(self.concerto, "/admin/reports").await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Report> {
        request::get(self.concerto, &format!("/admin/reports/{}", encode(report_id))).await
    }
}
