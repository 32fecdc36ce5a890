pub mod connection;
pub mod headless;
pub mod locator_script;
pub mod session;

pub use connection::connect_to_browser;
pub use headless::launch_browser;
pub use session::{ChromiumLauncher, ChromiumSession};
