#![deny(warnings)]

pub mod jobs;
mod utils;
