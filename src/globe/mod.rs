pub mod axis_angle;
pub mod controller;
pub mod drag;
pub mod mesh;
pub mod orientation;
pub mod recenter;

pub use controller::GlobeController;
pub use mesh::GlobeMesh;
pub use recenter::Tick;
