pub mod color_field;
pub mod fetch;
pub mod loader;
pub mod snapshot;

pub use color_field::{ColorField, LookupMode, unpack_rgb};
pub use loader::{DatasetSource, load_color_field};
pub use snapshot::{SNAPSHOT_SIZE, render_orthographic};
