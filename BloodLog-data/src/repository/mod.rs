// Repository module structure
pub mod errors;
mod collaborator;
mod in_memory;
mod remote;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use collaborator::CollaboratorTrait;
pub use in_memory::InMemoryCollaborator;
pub use remote::RemoteCollaborator;
