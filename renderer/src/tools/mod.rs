mod dynamic_buffer;
mod pipeline;

pub use dynamic_buffer::*;
pub use pipeline::*;
