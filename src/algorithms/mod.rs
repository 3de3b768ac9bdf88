pub mod flocking;
pub mod neighbors;
