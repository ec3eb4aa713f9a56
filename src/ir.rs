// src/ir.rs

pub mod enum_model;
