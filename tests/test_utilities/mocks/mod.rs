/// Mock implementations for testing
mod mock_graph_reader;
mod mock_progress_reporter;

pub use mock_graph_reader::MockGraphReader;
pub use mock_progress_reporter::MockProgressReporter;
