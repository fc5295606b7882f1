pub mod app;
pub mod family;
pub mod graph;
pub mod interaction;
pub mod logging;
pub mod physics;
pub mod scene;
pub mod session;
pub mod settings;
pub mod storage;
mod util;

pub use session::Session;
