/// Use cases module containing application business logic orchestration
mod resolve_references;

pub use resolve_references::ResolveReferencesUseCase;
