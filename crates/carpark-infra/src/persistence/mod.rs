//! Session repository implementations

mod file_session_repo;
mod memory_session_repo;

pub use file_session_repo::FileSessionRepository;
pub use memory_session_repo::MemorySessionRepository;
