use crate::application::dto::ResolveResponse;
use crate::shared::Result;

/// ReferenceFormatter port for rendering resolved references
///
/// Implementations must emit each target's list in the order it was
/// resolved; the order is part of the result.
pub trait ReferenceFormatter {
    /// Formats the resolved references as a string
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, response: &ResolveResponse) -> Result<String>;
}
