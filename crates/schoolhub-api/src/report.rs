// Activity logs and summary reports (admin role), plus CSV export.

use std::io;

use anyhow::Context;

use schoolhub_core::models::{ActivityFilter, ClassReport, ReportSummary, Role, UserActivity};

use crate::client::ApiClient;
use crate::error::ApiError;

pub struct ReportApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn activity(&self, filter: &ActivityFilter) -> Result<Vec<UserActivity>, ApiError> {
        self.client
            .get_with_query(Role::Admin, "/api/admin/activity".into(), filter.to_query())
            .await
    }

    pub async fn summary(&self) -> Result<ReportSummary, ApiError> {
        self.client
            .get(Role::Admin, "/api/admin/reports/summary".into())
            .await
    }

    pub async fn class_report(&self, class_id: &str) -> Result<ClassReport, ApiError> {
        self.client
            .get(Role::Admin, format!("/api/admin/reports/class/{class_id}"))
            .await
    }
}

/// Write activity rows as CSV with a
/// `timestamp,role,user_id,action,detail` header.
pub fn write_activity_csv<W: io::Write>(writer: W, rows: &[UserActivity]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["timestamp", "role", "user_id", "action", "detail"])
        .context("failed to write CSV header")?;
    for row in rows {
        csv.write_record([
            row.timestamp.to_rfc3339().as_str(),
            row.role.path_segment(),
            row.user_id.as_str(),
            row.action.as_str(),
            row.detail.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("failed to write activity {}", row.id))?;
    }
    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}
