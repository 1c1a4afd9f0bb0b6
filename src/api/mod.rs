pub mod handlers;
pub mod models;
pub mod openapi;

use crate::core::services::DivvyService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::realtime::in_memory::InMemoryBroadcast;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

/// The service instantiation the HTTP layer is wired against.
pub type AppService = DivvyService<InMemoryLogging, InMemoryStorage, InMemoryBroadcast>;
