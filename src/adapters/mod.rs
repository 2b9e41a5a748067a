/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports,
/// providing the actual integration with the file system and console.
/// The inbound side is the CLI in `cli.rs`.
pub mod outbound;
