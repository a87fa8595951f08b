//! Report generation port trait.

use std::path::Path;

use crate::domain::error::SamperfError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::scan::ScanReport;

/// Port for writing analysis reports.
pub trait ReportPort {
    fn write_performance(
        &self,
        report: &PerformanceReport,
        output_path: &Path,
    ) -> Result<(), SamperfError>;

    fn write_scan(&self, report: &ScanReport, output_path: &Path) -> Result<(), SamperfError>;
}
