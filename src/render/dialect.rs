use crate::render::sql::postgres::PostgresGenerator;
use crate::render::sql::snowflake::SnowflakeGenerator;
use crate::render::sql::sqlite::SqliteGenerator;
use crate::render::traits::SqlGenerator;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Snowflake,
    Postgres,
    SQLite,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::Snowflake
    }
}

impl Dialect {
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Snowflake => Box::new(SnowflakeGenerator),
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
        }
    }
}
