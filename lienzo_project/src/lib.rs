#![forbid(unsafe_code)]

pub mod error;
pub mod instance;
pub mod layer;
pub mod object;
pub mod project;
pub mod resources;
pub mod scene;

pub use error::*;
pub use instance::*;
pub use layer::*;
pub use object::*;
pub use project::*;
pub use resources::*;
pub use scene::*;
