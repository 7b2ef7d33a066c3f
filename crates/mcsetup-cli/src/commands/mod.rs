pub mod moves;
pub mod restart;
pub mod write;
