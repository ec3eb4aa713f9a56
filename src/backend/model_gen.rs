// src/backend/model_gen.rs

use super::naming::{is_valid_go_identifier, title_case};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::ir::enum_model::{EnumModel, EnumValue};
use crate::semantics::collector::EntrySet;
use std::collections::BTreeMap;

/// Package used when the output directory name cannot be a Go package.
pub const FALLBACK_PACKAGE: &str = "enum";
/// Value field type when the source type has no plain underlying type.
pub const DEFAULT_UNDERLYING: &str = "int";

/// Turns collected entries into the model the emitter renders.
pub struct ModelGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ModelGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        ModelGenerator { config }
    }

    pub fn generate(
        &self,
        source_package: &str,
        underlying: Option<&str>,
        entries: &EntrySet,
    ) -> Result<EnumModel, GenerateError> {
        let type_name = &self.config.type_name;
        let type_title = title_case(type_name);

        let values: Vec<EnumValue> = entries
            .ordered()
            .into_iter()
            .map(|entry| {
                let suffix = entry.name.strip_prefix(type_name.as_str()).unwrap_or(&entry.name);
                let name = title_case(suffix);
                let label = if self.config.lower_case {
                    name.to_lowercase()
                } else {
                    name.clone()
                };
                EnumValue {
                    private_name: entry.name.clone(),
                    public_name: format!("{}{}", type_title, suffix),
                    name,
                    label,
                    index: entry.value,
                }
            })
            .collect();

        if self.config.getter {
            check_unique_values(&values)?;
        }

        Ok(EnumModel {
            package: self.package_name(source_package),
            type_name: type_name.clone(),
            public_type: type_title,
            underlying: underlying.unwrap_or(DEFAULT_UNDERLYING).to_string(),
            values,
            features: self.config.features(),
        })
    }

    /// The source package, or the output directory's base name when one is
    /// configured.
    fn package_name(&self, source_package: &str) -> String {
        let Some(dir) = &self.config.output_dir else {
            return source_package.to_string();
        };
        match dir.file_name().and_then(|name| name.to_str()) {
            Some(base) if is_valid_go_identifier(base) => base.to_string(),
            _ => FALLBACK_PACKAGE.to_string(),
        }
    }
}

fn check_unique_values(values: &[EnumValue]) -> Result<(), GenerateError> {
    let mut by_value: BTreeMap<i64, Vec<&str>> = BTreeMap::new();
    for value in values {
        by_value
            .entry(value.index)
            .or_default()
            .push(value.private_name.as_str());
    }

    let clashes: Vec<String> = by_value
        .iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(value, names)| format!("multiple names for value {}: {}", value, names.join(", ")))
        .collect();

    if clashes.is_empty() {
        Ok(())
    } else {
        Err(GenerateError::DuplicateValues {
            clashes: clashes.join("; "),
        })
    }
}
