/// Dependency resolution domain - graph model, reference taxonomy and the
/// pure services that walk the graph. Nothing in here performs I/O.
pub mod domain;
pub mod services;
