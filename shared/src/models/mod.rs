//! Data models shared by server and clients

pub mod ticket;

pub use ticket::*;
