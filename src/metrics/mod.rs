//! @ai:module:intent Dialogue metrics and conversion aggregation
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricAverages, ConversionStats, DashboardSummary

pub mod aggregator;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use types::{
    ActiveInstruction, ConversionStats, DashboardSummary, MetricAverage, MetricAverages,
    MetricBreakdown, TaskRow, WeeklyCompletion,
};
