pub mod blink;
pub mod camera;
pub mod headless;
pub mod highlight;
pub mod labels;
pub mod layer;
pub mod symbology;

pub use highlight::*;
pub use layer::*;
