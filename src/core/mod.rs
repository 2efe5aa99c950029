//! 核心层：错误、响应、提取器、中间件，以及标识符编解码和文档序列化

pub mod error;
pub mod extract;
pub mod middleware;
pub mod object_id;
pub mod response;
pub mod serializer;
pub mod store;

pub use error::CoreError;
pub use object_id::MongoId;
pub use store::DocumentCollection;
