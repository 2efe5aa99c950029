//! 基础设施层：日志与文档集合实现

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod memory;

#[cfg(feature = "database")]
pub use database::{DatabaseManager, MongoCollection};
pub use logger::Logger;
pub use memory::MemoryCollection;
