pub mod analysis_dispatcher;
pub mod chunk_planner;
pub mod result_merger;
pub mod sentiment_resolver;

pub use analysis_dispatcher::{AnalysisBatch, AnalysisDispatcher, AnalysisReport};
pub use chunk_planner::ChunkPlanner;
pub use result_merger::{MergeSummary, ResultMerger};
pub use sentiment_resolver::{ResolutionSummary, SentimentResolver};
