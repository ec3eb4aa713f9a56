//! src/config.rs

use crate::ir::enum_model::Features;
use std::path::PathBuf;

/// Environment variable holding the tracing filter; `RUST_LOG` is used when
/// it is unset.
pub const LOG_ENV: &str = "ENUMGEN_LOG";

/// Settings for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Private Go type whose constants are collected, e.g. `status`.
    pub type_name: String,
    /// Where the generated file goes. `None` writes next to the sources.
    pub output_dir: Option<PathBuf>,
    pub lower_case: bool,
    pub getter: bool,
    pub sql: bool,
    pub bson: bool,
    pub yaml: bool,
}

impl GeneratorConfig {
    pub fn new(type_name: impl Into<String>) -> Self {
        GeneratorConfig {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn lower_case(mut self, enabled: bool) -> Self {
        self.lower_case = enabled;
        self
    }

    pub fn getter(mut self, enabled: bool) -> Self {
        self.getter = enabled;
        self
    }

    pub fn sql(mut self, enabled: bool) -> Self {
        self.sql = enabled;
        self
    }

    pub fn bson(mut self, enabled: bool) -> Self {
        self.bson = enabled;
        self
    }

    pub fn yaml(mut self, enabled: bool) -> Self {
        self.yaml = enabled;
        self
    }

    pub fn features(&self) -> Features {
        Features {
            lower_case: self.lower_case,
            getter: self.getter,
            sql: self.sql,
            bson: self.bson,
            yaml: self.yaml,
        }
    }
}
