//! One module per remote provider.

pub mod attainment;
pub mod digest;
pub mod early_childhood;
pub mod literacy;
pub mod proficiency;
