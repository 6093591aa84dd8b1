pub mod fleet_report;
pub mod fleet_summary;
