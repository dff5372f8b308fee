pub mod classify;
pub mod region;
pub mod transitions;

pub use classify::*;
pub use region::*;
pub use transitions::*;
