pub mod chat;
pub mod horizon;

pub use chat::*;
pub use horizon::*;
