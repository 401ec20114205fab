pub mod config;
pub mod leads;
pub mod output;
pub mod priority;
