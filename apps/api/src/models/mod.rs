pub mod analysis;
pub mod feedback;

pub use analysis::AnalysisRecord;
pub use feedback::FeedbackRecord;
