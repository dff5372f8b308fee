pub mod change_map;
pub mod loader;
pub mod region_mapping;
pub mod tabular;

pub use change_map::*;
pub use loader::*;
pub use region_mapping::*;
pub use tabular::*;
