// src/semantics/type_resolver.rs

use crate::ast::{DeclKeyword, Declaration, SourceFile, Spec};
use std::collections::HashMap;

/// Table of `type name ident` declarations found in a package.
pub struct TypeResolver {
    /// Type name to underlying identifier. The first declaration wins.
    pub types: HashMap<String, String>,
}

impl TypeResolver {
    pub fn new() -> Self {
        TypeResolver {
            types: HashMap::new(),
        }
    }

    /// Records every plain type definition of the given files, in order.
    pub fn scan(&mut self, units: &[SourceFile]) {
        for file in units {
            for Declaration::Gen(decl) in &file.declarations {
                if decl.keyword != DeclKeyword::Type {
                    continue;
                }
                for spec in &decl.specs {
                    if let Spec::Type(type_spec) = spec {
                        if let Some(underlying) = &type_spec.underlying {
                            self.types
                                .entry(type_spec.name.name.clone())
                                .or_insert_with(|| underlying.clone());
                        }
                    }
                }
            }
        }
    }

    pub fn underlying(&self, type_name: &str) -> Option<&str> {
        self.types.get(type_name).map(String::as_str)
    }
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Underlying identifier of `type_name`, or `None` when it is not declared as
/// `type <type_name> <ident>`.
pub fn resolve(units: &[SourceFile], type_name: &str) -> Option<String> {
    let mut resolver = TypeResolver::new();
    resolver.scan(units);
    resolver.underlying(type_name).map(str::to_string)
}
