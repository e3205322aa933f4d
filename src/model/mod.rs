pub mod item;
pub mod resource;
pub mod snapshot;
