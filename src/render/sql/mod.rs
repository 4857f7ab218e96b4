//! Dialect generators.

pub mod postgres;
pub mod snowflake;
pub mod sqlite;
