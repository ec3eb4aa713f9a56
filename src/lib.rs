//src/lib.rs
pub mod ast;
pub mod backend;
pub mod config;
pub mod error;
pub mod generator;
pub mod ir;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod semantics;

pub use config::GeneratorConfig;
pub use error::GenerateError;
pub use generator::Generator;
