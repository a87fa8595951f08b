//! JSON report adapter implementing ReportPort.
//!
//! Non-finite numbers are written as the strings `"NaN"`, `"inf"` and `"-inf"`.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::SamperfError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::scan::ScanReport;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        JsonReportAdapter
    }

    pub fn to_json<T: Serialize>(value: &T) -> Result<String, SamperfError> {
        serde_json::to_string_pretty(value).map_err(|e| SamperfError::Report {
            reason: format!("failed to serialize report: {e}"),
        })
    }

    fn write<T: Serialize>(&self, value: &T, output_path: &Path) -> Result<(), SamperfError> {
        let json = Self::to_json(value)?;
        fs::write(output_path, json).map_err(|e| SamperfError::Report {
            reason: format!("failed to write {}: {e}", output_path.display()),
        })?;
        tracing::info!(path = %output_path.display(), "report written");
        Ok(())
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_performance(
        &self,
        report: &PerformanceReport,
        output_path: &Path,
    ) -> Result<(), SamperfError> {
        self.write(report, output_path)
    }

    fn write_scan(&self, report: &ScanReport, output_path: &Path) -> Result<(), SamperfError> {
        self.write(report, output_path)
    }
}
