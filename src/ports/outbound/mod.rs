/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, console, etc.).
pub mod formatter;
pub mod graph_reader;
pub mod output_presenter;
pub mod progress_reporter;

pub use formatter::ReferenceFormatter;
pub use graph_reader::GraphReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
