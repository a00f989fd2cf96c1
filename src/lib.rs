//! moodlist library
//!
//! The mood analysis core shared by the `moodlist` TUI and the `train-model` tool.

pub mod mood;
