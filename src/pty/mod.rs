mod error;
mod resize;
mod routing;
mod session;
mod size;

pub use error::PtyError;
pub use resize::ResizeWatcher;
pub use routing::{OutputSource, Route, StreamRouting};
pub use session::{spawn_child, PtyMaster, PtyPair};
pub use size::WindowSize;
