use crate::render::traits::SqlGenerator;

pub struct SnowflakeGenerator;

impl SqlGenerator for SnowflakeGenerator {
    fn bool_literal(&self, val: bool) -> String {
        if val { "true".to_string() } else { "false".to_string() }
    }
}
