//! src/generator.rs

use crate::ast::SourceFile;
use crate::backend::emitter::emit_enum;
use crate::backend::model_gen::ModelGenerator;
use crate::backend::naming::file_name_for_type;
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::semantics::collector::{EntryCollector, EntrySet};
use crate::semantics::type_resolver;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What `parse` learned about the package.
#[derive(Debug)]
struct ParsedPackage {
    dir: PathBuf,
    package: String,
    underlying: Option<String>,
    entries: EntrySet,
}

/// Drives one enum type from Go sources to the generated file.
pub struct Generator {
    config: GeneratorConfig,
    parsed: Option<ParsedPackage>,
}

impl Generator {
    /// The type name must be non-empty and start with a lower-case letter.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        match config.type_name.chars().next() {
            None => return Err(GenerateError::EmptyTypeName),
            Some(first) if !first.is_lowercase() => return Err(GenerateError::TypeNotPrivate),
            Some(_) => {}
        }
        Ok(Generator {
            config,
            parsed: None,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Entries found by the last successful `parse`.
    pub fn entries(&self) -> Option<&EntrySet> {
        self.parsed.as_ref().map(|parsed| &parsed.entries)
    }

    /// Underlying Go type of the enum, if the package declares one.
    pub fn underlying_type(&self) -> Option<&str> {
        self.parsed.as_ref().and_then(|parsed| parsed.underlying.as_deref())
    }

    /// Reads the package in `dir` and collects the constants of the type.
    pub fn parse(&mut self, dir: impl AsRef<Path>) -> Result<(), GenerateError> {
        let dir = dir.as_ref();
        info!(dir = %dir.display(), type_name = %self.config.type_name, "parsing package");

        let units = read_package(dir)?;
        let package = units
            .first()
            .map(|unit| unit.package.clone())
            .unwrap_or_default();
        let underlying = type_resolver::resolve(&units, &self.config.type_name);
        debug!(?underlying, "resolved underlying type");

        let entries = EntryCollector::new(&self.config.type_name).collect(&units)?;
        info!(count = entries.len(), "collected enum values");

        self.parsed = Some(ParsedPackage {
            dir: dir.to_path_buf(),
            package,
            underlying,
            entries,
        });
        Ok(())
    }

    /// Renders the generated Go source without touching the filesystem.
    pub fn render(&self) -> Result<String, GenerateError> {
        let parsed = self.parsed.as_ref().ok_or(GenerateError::NotParsed)?;
        let model = ModelGenerator::new(&self.config).generate(
            &parsed.package,
            parsed.underlying.as_deref(),
            &parsed.entries,
        )?;
        info!(package = %model.package, values = model.values.len(), "emitting enum");
        Ok(emit_enum(&model)?)
    }

    /// Writes `<type>_enum.go` and returns its path. Without a configured
    /// output directory the file lands next to the parsed sources.
    pub fn generate(&self) -> Result<PathBuf, GenerateError> {
        let parsed = self.parsed.as_ref().ok_or(GenerateError::NotParsed)?;
        let source = self.render()?;

        let out_dir = match &self.config.output_dir {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(|source| GenerateError::Io {
                    action: "create output directory",
                    path: dir.clone(),
                    source,
                })?;
                dir.clone()
            }
            None => parsed.dir.clone(),
        };

        let path = out_dir.join(file_name_for_type(&self.config.type_name));
        fs::write(&path, source).map_err(|source| GenerateError::Io {
            action: "write output file",
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote enum file");
        Ok(path)
    }
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> GenerateError {
    let path = path.to_path_buf();
    move |source| GenerateError::Io { action, path, source }
}

/// Lexes and parses every non-test `.go` file of `dir`, sorted by file name.
fn read_package(dir: &Path) -> Result<Vec<SourceFile>, GenerateError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error("read directory", dir))? {
        let path = entry.map_err(io_error("read directory", dir))?.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.ends_with(".go") && !name.ends_with("_test.go") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut units = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).map_err(io_error("read file", &path))?;
        let tokens = tokenize(&source).map_err(|source| GenerateError::Lex {
            path: path.clone(),
            source,
        })?;
        let unit = Parser::new(&tokens).parse().map_err(|source| GenerateError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(file = %path.display(), declarations = unit.declarations.len(), "parsed file");
        units.push(unit);
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_validation() {
        assert!(matches!(
            Generator::new(GeneratorConfig::new("")),
            Err(GenerateError::EmptyTypeName)
        ));
        let err = Generator::new(GeneratorConfig::new("Status")).err().unwrap();
        assert_eq!(err.to_string(), "first letter must be lowercase (private)");
        assert!(matches!(
            Generator::new(GeneratorConfig::new("_status")),
            Err(GenerateError::TypeNotPrivate)
        ));
        assert!(Generator::new(GeneratorConfig::new("jobStatus")).is_ok());
    }

    #[test]
    fn test_generate_before_parse_fails() {
        let generator = Generator::new(GeneratorConfig::new("status")).unwrap();
        assert!(matches!(generator.generate(), Err(GenerateError::NotParsed)));
        assert!(matches!(generator.render(), Err(GenerateError::NotParsed)));
        assert!(generator.entries().is_none());
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let mut generator = Generator::new(GeneratorConfig::new("status")).unwrap();
        let err = generator.parse("/definitely/not/a/real/dir").unwrap_err();
        assert!(matches!(err, GenerateError::Io { action: "read directory", .. }));
    }
}
