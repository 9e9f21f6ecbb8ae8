pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use protocol::build_router;
pub use server::{ServerConfig, StreamingServer};
