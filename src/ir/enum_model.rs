// src/ir/enum_model.rs

//! The enum as the emitter sees it: names already derived, values in
//! declaration order.

/// Which optional method groups to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub lower_case: bool,
    pub getter: bool,
    pub sql: bool,
    pub bson: bool,
    pub yaml: bool,
}

/// One enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub private_name: String, // statusActive
    pub public_name: String,  // StatusActive
    pub name: String,         // Active
    /// Text used by String/MarshalText and the parse functions.
    pub label: String,
    pub index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    pub package: String,
    /// The private source type, e.g. `status`.
    pub type_name: String,
    /// The generated exported type, e.g. `Status`.
    pub public_type: String,
    /// Go type of the `value` field; `int` when the source type has no
    /// plain underlying identifier.
    pub underlying: String,
    pub values: Vec<EnumValue>,
    pub features: Features,
}
