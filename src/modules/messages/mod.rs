pub mod controller;
pub mod conversations;
pub mod model;
pub mod router;
pub mod service;

pub use router::init_messages_router;
