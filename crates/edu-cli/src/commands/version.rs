//! `version`: print the crate version.

pub fn line() -> String { format!("edu-stats {}", env!("CARGO_PKG_VERSION")) }

pub fn run() { println!("{}", line()); }
