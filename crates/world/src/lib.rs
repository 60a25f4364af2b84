//! Placed garden beds and the maps they live on.

mod adjacency;
mod bed;
mod breakage;
mod draw;
mod interaction;
mod location;
mod persist;
mod scheduler;
mod soil;
mod world;

#[cfg(test)]
mod test_support;

pub use adjacency::*;
pub use bed::*;
pub use breakage::*;
pub use draw::*;
pub use interaction::*;
pub use location::*;
pub use persist::*;
pub use scheduler::*;
pub use soil::*;
pub use world::*;
