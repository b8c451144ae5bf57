//! Core data structures for the Kittener engine.

pub mod genome;
