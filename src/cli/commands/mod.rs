pub mod resources;
pub mod serve;
pub mod token;
