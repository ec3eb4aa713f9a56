// src/backend/emitter.rs

use crate::ir::enum_model::{EnumModel, EnumValue};
use std::collections::BTreeSet;
use std::fmt::Write;

pub const HEADER: &str = "// Code generated by enum generator; DO NOT EDIT.";

/// Renders the Go source for one enum. The output is already laid out the
/// way gofmt would print it.
pub fn emit_enum(model: &EnumModel) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{}", HEADER)?;
    writeln!(output, "package {}", model.package)?;
    writeln!(output)?;
    emit_imports(&mut output, model)?;
    emit_type(&mut output, model)?;
    emit_text_methods(&mut output, model)?;
    if model.features.sql {
        emit_sql_methods(&mut output, model)?;
    }
    if model.features.bson {
        emit_bson_methods(&mut output, model)?;
    }
    if model.features.yaml {
        emit_yaml_methods(&mut output, model)?;
    }
    emit_parse_functions(&mut output, model)?;
    if model.features.getter {
        emit_getter(&mut output, model)?;
    }
    emit_public_values(&mut output, model)?;
    emit_collections(&mut output, model)?;
    emit_unused_guard(&mut output, model)?;

    Ok(output)
}

fn emit_imports(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let features = model.features;
    let mut standard = vec!["fmt"];
    if features.sql {
        standard.push("database/sql/driver");
    }
    if !features.lower_case {
        standard.push("strings");
    }
    standard.sort_unstable();

    let mut external = Vec::new();
    if features.bson {
        external.push("go.mongodb.org/mongo-driver/bson");
        external.push("go.mongodb.org/mongo-driver/bson/bsontype");
    }
    if features.yaml {
        external.push("gopkg.in/yaml.v3");
    }

    writeln!(output, "import (")?;
    for path in &standard {
        writeln!(output, "\t\"{}\"", path)?;
    }
    if !external.is_empty() {
        writeln!(output)?;
        for path in &external {
            writeln!(output, "\t\"{}\"", path)?;
        }
    }
    writeln!(output, ")")?;
    writeln!(output)?;
    Ok(())
}

fn emit_type(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// {} is the exported type for the enum", t)?;
    writeln!(output, "type {} struct {{", t)?;
    writeln!(output, "\tname  string")?;
    writeln!(output, "\tvalue {}", model.underlying)?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "func (e {}) String() string {{ return e.name }}", t)?;
    writeln!(output)?;
    writeln!(output, "// Index returns the underlying integer value")?;
    writeln!(output, "func (e {}) Index() {} {{ return e.value }}", t, model.underlying)?;
    writeln!(output)?;
    Ok(())
}

fn emit_text_methods(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// MarshalText implements encoding.TextMarshaler")?;
    writeln!(output, "func (e {}) MarshalText() ([]byte, error) {{", t)?;
    writeln!(output, "\treturn []byte(e.name), nil")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "// UnmarshalText implements encoding.TextUnmarshaler")?;
    writeln!(output, "func (e *{}) UnmarshalText(text []byte) error {{", t)?;
    writeln!(output, "\tvar err error")?;
    writeln!(output, "\t*e, err = Parse{}(string(text))", t)?;
    writeln!(output, "\treturn err")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    Ok(())
}

/// `*e = val` tail shared by every unmarshal-style method.
fn emit_parse_and_assign(output: &mut String, t: &str, source: &str) -> Result<(), std::fmt::Error> {
    writeln!(output, "\tval, err := Parse{}({})", t, source)?;
    writeln!(output, "\tif err != nil {{")?;
    writeln!(output, "\t\treturn err")?;
    writeln!(output, "\t}}")?;
    writeln!(output)?;
    writeln!(output, "\t*e = val")?;
    writeln!(output, "\treturn nil")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    Ok(())
}

fn emit_sql_methods(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// Value implements the driver.Valuer interface")?;
    writeln!(output, "func (e {}) Value() (driver.Value, error) {{", t)?;
    writeln!(output, "\treturn e.name, nil")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "// Scan implements the sql.Scanner interface")?;
    writeln!(output, "func (e *{}) Scan(value interface{{}}) error {{", t)?;
    writeln!(output, "\tif value == nil {{")?;
    writeln!(output, "\t\t// NULL maps to the value with index 0, if there is one")?;
    writeln!(output, "\t\tfor _, v := range {}Values {{", t)?;
    writeln!(output, "\t\t\tif v.Index() == 0 {{")?;
    writeln!(output, "\t\t\t\t*e = v")?;
    writeln!(output, "\t\t\t\treturn nil")?;
    writeln!(output, "\t\t\t}}")?;
    writeln!(output, "\t\t}}")?;
    writeln!(
        output,
        "\t\treturn fmt.Errorf(\"cannot scan nil into {}: no zero value defined\")",
        t
    )?;
    writeln!(output, "\t}}")?;
    writeln!(output)?;
    writeln!(output, "\tstr, ok := value.(string)")?;
    writeln!(output, "\tif !ok {{")?;
    writeln!(output, "\t\tif b, ok := value.([]byte); ok {{")?;
    writeln!(output, "\t\t\tstr = string(b)")?;
    writeln!(output, "\t\t}} else {{")?;
    writeln!(
        output,
        "\t\t\treturn fmt.Errorf(\"invalid {} value: %v\", value)",
        model.type_name
    )?;
    writeln!(output, "\t\t}}")?;
    writeln!(output, "\t}}")?;
    writeln!(output)?;
    emit_parse_and_assign(output, t, "str")
}

fn emit_bson_methods(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// MarshalBSONValue implements bson.ValueMarshaler")?;
    writeln!(output, "func (e {}) MarshalBSONValue() (bsontype.Type, []byte, error) {{", t)?;
    writeln!(output, "\treturn bson.MarshalValue(e.String())")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "// UnmarshalBSONValue implements bson.ValueUnmarshaler")?;
    writeln!(
        output,
        "func (e *{}) UnmarshalBSONValue(t bsontype.Type, data []byte) error {{",
        t
    )?;
    writeln!(output, "\tvar s string")?;
    writeln!(output, "\tif err := bson.UnmarshalValue(t, data, &s); err != nil {{")?;
    writeln!(output, "\t\treturn err")?;
    writeln!(output, "\t}}")?;
    emit_parse_and_assign(output, t, "s")
}

fn emit_yaml_methods(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// MarshalYAML implements yaml.Marshaler")?;
    writeln!(output, "func (e {}) MarshalYAML() (any, error) {{", t)?;
    writeln!(output, "\treturn e.String(), nil")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    writeln!(output, "// UnmarshalYAML implements yaml.Unmarshaler")?;
    writeln!(output, "func (e *{}) UnmarshalYAML(value *yaml.Node) error {{", t)?;
    writeln!(output, "\tvar s string")?;
    writeln!(output, "\tif err := value.Decode(&s); err != nil {{")?;
    writeln!(output, "\t\treturn err")?;
    writeln!(output, "\t}}")?;
    emit_parse_and_assign(output, t, "s")
}

fn emit_parse_functions(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    let map_name = format!("_{}ParseMap", model.type_name);

    let keys: Vec<String> = model
        .values
        .iter()
        .map(|v| format!("\"{}\":", v.label.to_lowercase()))
        .collect();
    let width = keys.iter().map(String::len).max().unwrap_or(0);

    writeln!(output, "var {} = map[string]{}{{", map_name, t)?;
    for (key, value) in keys.iter().zip(&model.values) {
        writeln!(output, "\t{:<width$} {},", key, value.public_name, width = width)?;
    }
    writeln!(output, "}}")?;
    writeln!(output)?;

    let lookup = if model.features.lower_case {
        "v".to_string()
    } else {
        "strings.ToLower(v)".to_string()
    };
    writeln!(output, "// Parse{} converts string to {} enum value", t, model.type_name)?;
    writeln!(output, "func Parse{}(v string) ({}, error) {{", t, t)?;
    writeln!(output, "\tif val, ok := {}[{}]; ok {{", map_name, lookup)?;
    writeln!(output, "\t\treturn val, nil")?;
    writeln!(output, "\t}}")?;
    writeln!(output, "\treturn {}{{}}, fmt.Errorf(\"invalid {}: %s\", v)", t, model.type_name)?;
    writeln!(output, "}}")?;
    writeln!(output)?;

    writeln!(output, "// Must{} is like Parse{} but panics if string is invalid", t, t)?;
    writeln!(output, "func Must{}(v string) {} {{", t, t)?;
    writeln!(output, "\tr, err := Parse{}(v)", t)?;
    writeln!(output, "\tif err != nil {{")?;
    writeln!(output, "\t\tpanic(err)")?;
    writeln!(output, "\t}}")?;
    writeln!(output, "\treturn r")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    Ok(())
}

fn emit_getter(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// Get{}ByID returns the {} with the given underlying value", t, model.type_name)?;
    writeln!(output, "func Get{}ByID(v {}) ({}, error) {{", t, model.underlying, t)?;
    writeln!(output, "\tswitch v {{")?;
    let mut seen = BTreeSet::new();
    for value in &model.values {
        // Values are unique once the model is built with a getter.
        if seen.insert(value.index) {
            writeln!(output, "\tcase {}:", value.index)?;
            writeln!(output, "\t\treturn {}, nil", value.public_name)?;
        }
    }
    writeln!(output, "\t}}")?;
    writeln!(output, "\treturn {}{{}}, fmt.Errorf(\"invalid {} value: %d\", v)", t, model.type_name)?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    Ok(())
}

fn emit_public_values(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let width = model
        .values
        .iter()
        .map(|v| v.public_name.len())
        .max()
        .unwrap_or(0);

    writeln!(output, "// Public constants for {} values", model.type_name)?;
    writeln!(output, "var (")?;
    for value in &model.values {
        writeln!(
            output,
            "\t{:<width$} = {}{{name: \"{}\", value: {}}}",
            value.public_name,
            model.public_type,
            value.label,
            value.index,
            width = width
        )?;
    }
    writeln!(output, ")")?;
    writeln!(output)?;
    Ok(())
}

fn emit_collections(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let t = &model.public_type;
    writeln!(output, "// {}Values contains all possible enum values", t)?;
    writeln!(output, "var {}Values = []{}{{", t, t)?;
    for value in &model.values {
        writeln!(output, "\t{},", value.public_name)?;
    }
    writeln!(output, "}}")?;
    writeln!(output)?;

    writeln!(output, "// {}Names contains all possible enum names", t)?;
    writeln!(output, "var {}Names = []string{{", t)?;
    for value in &model.values {
        writeln!(output, "\t\"{}\",", value.label)?;
    }
    writeln!(output, "}}")?;
    writeln!(output)?;

    writeln!(output, "// {}Iter returns a function compatible with Go 1.23's range-over-func syntax.", t)?;
    writeln!(output, "// It yields all {} values in declaration order. Example:", t)?;
    writeln!(output, "//")?;
    writeln!(output, "//\tfor v := range {}Iter() {{", t)?;
    writeln!(output, "//\t    // use v")?;
    writeln!(output, "//\t}}")?;
    writeln!(output, "func {}Iter() func(yield func({}) bool) {{", t, t)?;
    writeln!(output, "\treturn func(yield func({}) bool) {{", t)?;
    writeln!(output, "\t\tfor _, v := range {}Values {{", t)?;
    writeln!(output, "\t\t\tif !yield(v) {{")?;
    writeln!(output, "\t\t\t\tbreak")?;
    writeln!(output, "\t\t\t}}")?;
    writeln!(output, "\t\t}}")?;
    writeln!(output, "\t}}")?;
    writeln!(output, "}}")?;
    writeln!(output)?;
    Ok(())
}

fn emit_unused_guard(output: &mut String, model: &EnumModel) -> Result<(), std::fmt::Error> {
    let private = &model.type_name;
    writeln!(output, "// These variables are used to prevent the compiler from reporting unused errors")?;
    writeln!(output, "// for the original enum constants. They are intentionally placed in a var block")?;
    writeln!(output, "// that is compiled away by the Go compiler.")?;
    writeln!(output, "var _ = func() bool {{")?;
    writeln!(output, "\tvar _ {} = {}(0)", private, private)?;
    for EnumValue { private_name, .. } in &model.values {
        writeln!(output, "\t// This avoids \"defined but not used\" linter error for {}", private_name)?;
        writeln!(output, "\tvar _ {} = {}", private, private_name)?;
    }
    writeln!(output, "\treturn true")?;
    writeln!(output, "}}()")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::enum_model::Features;
    use pretty_assertions::assert_eq;

    fn value(type_title: &str, private_name: &str, name: &str, label: &str, index: i64) -> EnumValue {
        EnumValue {
            private_name: private_name.to_string(),
            public_name: format!("{}{}", type_title, name),
            name: name.to_string(),
            label: label.to_string(),
            index,
        }
    }

    fn status_model(features: Features) -> EnumModel {
        let lower = features.lower_case;
        let label = |name: &str| if lower { name.to_lowercase() } else { name.to_string() };
        EnumModel {
            package: "testdata".to_string(),
            type_name: "status".to_string(),
            public_type: "Status".to_string(),
            underlying: "uint8".to_string(),
            values: vec![
                value("Status", "statusUnknown", "Unknown", &label("Unknown"), 0),
                value("Status", "statusActive", "Active", &label("Active"), 1),
                value("Status", "statusInactive", "Inactive", &label("Inactive"), 2),
                value("Status", "statusBlocked", "Blocked", &label("Blocked"), 3),
            ],
            features,
        }
    }

    fn section<'a>(source: &'a str, start: &str) -> &'a str {
        let begin = source.find(start).expect("section should exist");
        let rest = &source[begin..];
        let end = rest.find("\n}\n").map(|i| i + 3).unwrap_or(rest.len());
        &rest[..end]
    }

    #[test]
    fn test_default_output_layout() {
        let source = emit_enum(&status_model(Features::default())).unwrap();

        assert!(source.starts_with("// Code generated by enum generator; DO NOT EDIT.\npackage testdata\n"));
        assert!(source.contains("import (\n\t\"fmt\"\n\t\"strings\"\n)\n"));
        assert!(source.contains("type Status struct {\n\tname  string\n\tvalue uint8\n}"));
        assert!(source.contains("func (e Status) String() string { return e.name }"));
        assert!(source.contains("func (e Status) Index() uint8 { return e.value }"));
        assert!(source.contains("func (e Status) MarshalText() ([]byte, error)"));
        assert!(source.contains("func (e *Status) UnmarshalText(text []byte) error"));
        assert!(source.contains("ParseStatus(string(text))"));
        assert!(source.contains("func MustStatus(v string) Status {"));
        assert!(!source.contains("driver.Value"));
        assert!(!source.contains("MarshalBSONValue"));
        assert!(!source.contains("MarshalYAML"));
        assert!(!source.contains("ByID"));
    }

    #[test]
    fn test_parse_map_is_aligned_and_lower_cased() {
        let source = emit_enum(&status_model(Features::default())).unwrap();
        assert_eq!(
            section(&source, "var _statusParseMap"),
            "var _statusParseMap = map[string]Status{\n\t\"unknown\":  StatusUnknown,\n\t\"active\":   StatusActive,\n\t\"inactive\": StatusInactive,\n\t\"blocked\":  StatusBlocked,\n}\n"
        );
        assert!(source.contains("if val, ok := _statusParseMap[strings.ToLower(v)]; ok {"));
        assert!(source.contains("fmt.Errorf(\"invalid status: %s\", v)"));
    }

    #[test]
    fn test_lower_case_mode() {
        let features = Features {
            lower_case: true,
            ..Features::default()
        };
        let source = emit_enum(&status_model(features)).unwrap();
        assert!(source.contains(r#"StatusActive   = Status{name: "active", value: 1}"#));
        assert!(source.contains("\"active\":   StatusActive"));
        assert!(!source.contains("strings"));
        let parse = section(&source, "func ParseStatus");
        assert!(parse.contains("_statusParseMap[v]"));
    }

    #[test]
    fn test_public_values_in_declaration_order() {
        let source = emit_enum(&status_model(Features::default())).unwrap();
        assert!(source.contains(
            "var (\n\tStatusUnknown  = Status{name: \"Unknown\", value: 0}\n\tStatusActive   = Status{name: \"Active\", value: 1}\n\tStatusInactive = Status{name: \"Inactive\", value: 2}\n\tStatusBlocked  = Status{name: \"Blocked\", value: 3}\n)\n"
        ));
        assert!(source.contains("var StatusValues = []Status{\n\tStatusUnknown,\n\tStatusActive,\n\tStatusInactive,\n\tStatusBlocked,\n}"));
        assert!(source.contains("var StatusNames = []string{\n\t\"Unknown\",\n\t\"Active\",\n\t\"Inactive\",\n\t\"Blocked\",\n}"));
        assert!(source.contains("func StatusIter() func(yield func(Status) bool) {"));
        assert!(!source.contains("func StatusValues()"));
    }

    #[test]
    fn test_sql_methods() {
        let features = Features {
            sql: true,
            ..Features::default()
        };
        let source = emit_enum(&status_model(features)).unwrap();
        assert!(source.contains("import (\n\t\"database/sql/driver\"\n\t\"fmt\"\n\t\"strings\"\n)"));
        assert!(source.contains("func (e Status) Value() (driver.Value, error)"));
        assert!(source.contains("func (e *Status) Scan(value interface{}) error"));
        assert!(source.contains("if v.Index() == 0 {\n\t\t\t\t*e = v\n\t\t\t\treturn nil"));
        assert!(source.contains("cannot scan nil into Status: no zero value defined"));
        assert!(source.contains("if b, ok := value.([]byte); ok {"));
        assert!(source.contains("invalid status value: %v"));
    }

    #[test]
    fn test_bson_and_yaml_methods() {
        let features = Features {
            bson: true,
            yaml: true,
            ..Features::default()
        };
        let source = emit_enum(&status_model(features)).unwrap();
        assert!(source.contains(
            "\t\"strings\"\n\n\t\"go.mongodb.org/mongo-driver/bson\"\n\t\"go.mongodb.org/mongo-driver/bson/bsontype\"\n\t\"gopkg.in/yaml.v3\"\n)"
        ));
        assert!(source.contains("func (e Status) MarshalBSONValue() (bsontype.Type, []byte, error)"));
        assert!(source.contains("return bson.MarshalValue(e.String())"));
        assert!(source.contains("func (e *Status) UnmarshalBSONValue(t bsontype.Type, data []byte) error"));
        assert!(source.contains("func (e Status) MarshalYAML() (any, error)"));
        assert!(source.contains("func (e *Status) UnmarshalYAML(value *yaml.Node) error"));
    }

    #[test]
    fn test_getter_switch() {
        let features = Features {
            getter: true,
            ..Features::default()
        };
        let mut model = status_model(features);
        model.type_name = "jobStatus".to_string();
        model.public_type = "JobStatus".to_string();
        for v in &mut model.values {
            v.public_name = format!("JobStatus{}", v.name);
        }
        let source = emit_enum(&model).unwrap();
        assert!(source.contains("func GetJobStatusByID(v uint8) (JobStatus, error)"));
        assert!(source.contains("case 0:\n\t\treturn JobStatusUnknown, nil"));
        assert!(source.contains("case 3:\n\t\treturn JobStatusBlocked, nil"));
    }

    #[test]
    fn test_unused_constant_guard() {
        let source = emit_enum(&status_model(Features::default())).unwrap();
        assert!(source.contains("var _ = func() bool {"));
        assert!(source.contains("\tvar _ status = status(0)\n"));
        assert!(source.contains("\tvar _ status = statusUnknown\n"));
        assert!(source.contains("\tvar _ status = statusBlocked\n"));
        assert!(source.ends_with("\treturn true\n}()\n"));
    }
}
