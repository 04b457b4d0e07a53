//! Remote control for voxsculpt - newline-delimited JSON commands over TCP
//!
//! Start the command server next to an editor:
//! ```ignore
//! let handler = Arc::new(Mutex::new(MyHandler::new()));
//! let _server = CommandServer::start(handler, voxsculpt_remote::DEFAULT_PORT);
//! ```

pub mod protocol;
pub mod server;

pub use protocol::*;
pub use server::{CommandHandler, CommandServer, ServerError};

/// Default command server port
pub const DEFAULT_PORT: u16 = 9743;
