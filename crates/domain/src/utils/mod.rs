//! Domain utility functions

pub mod time;
