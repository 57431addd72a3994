pub mod ratios;
pub mod three_statement;
