pub mod days;
pub mod diary;
pub mod freeze;
pub mod resources;
mod pool;

pub use pool::create_pool;
