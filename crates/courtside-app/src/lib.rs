// Courtside application: configuration, week files on disk and the week
// report built from them.

pub mod config;
pub mod report;
pub mod source;
