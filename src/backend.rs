// src/backend.rs

pub mod emitter;
pub mod model_gen;
pub mod naming;
