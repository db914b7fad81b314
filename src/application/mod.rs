// Application layer: the ledger engine that owns balance mutation and the
// service facade that clients (HTTP, CLI) call into.

mod engine;
mod locks;
mod service;

pub mod error;

pub use engine::*;
pub use error::*;
pub use locks::*;
pub use service::*;
