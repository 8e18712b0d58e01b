//! Integration tests
//!
//! End-to-end tests through the router and real sockets

pub mod database;
