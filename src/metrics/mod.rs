pub mod host;
pub mod monitor;
pub mod pool;
pub mod registry;
pub mod ring_buffer;
pub mod sample;
