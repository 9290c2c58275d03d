pub mod locomotion;
pub mod query;
pub mod step;
