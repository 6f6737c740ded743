// src/services/mod.rs
pub mod chart;
pub mod classifier;
pub mod headlines;
pub mod lexicon;
pub mod pipeline;
pub mod render;
pub mod skew;
