//! Client-side state: the session and where its token is persisted.

pub mod session;
pub mod storage;

pub use session::{ResolveOutcome, Session, SessionStore};
pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageError, TokenStorage};
