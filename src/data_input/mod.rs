// src/data_input/mod.rs

pub mod recording;
pub mod recording_loader;

// src/data_input/mod.rs
