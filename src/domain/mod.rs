pub mod candidate;
pub mod track;
