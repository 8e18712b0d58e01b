//! PostgreSQL backend tests
//!
//! Run against the database named by `DATABASE_URL`; skipped without one.

mod conversation_log_test;
mod migrations_test;
