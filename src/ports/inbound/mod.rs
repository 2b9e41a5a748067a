/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod reference_resolution_port;

pub use reference_resolution_port::ReferenceResolutionPort;
