//! # WebWin Runtime
//!
//! Call bridge between host functions and a web front end shown in a browser window.
//!
//! ## Overview
//!
//! Host functions and objects are exposed on a [`BridgeBuilder`]. Building it yields a
//! [`Bridge`] made of:
//! - **Stub bundle**: the `webwin` JavaScript object injected into the shown page, one
//!   async stub per exposed name
//! - **Dispatcher**: the read-only table routing front-end calls to their handlers
//!
//! Every call from the front end carries its positional arguments as a JSON array and is
//! answered with a JSON envelope, `{"status":"succ","retval":...}` or
//! `{"status":"fail","msg":"..."}`. A failing handler never leaves the front end's call
//! unresolved.
//!
//! ## Quick Start
//!
//! ```rust
//! use webwin_runtime::{Bridge, MemoryChannel, Window, ShowOptions};
//! use webwin_config::window::WindowConfig;
//!
//! fn swap(a: String, b: String) -> Result<(String, String), String> {
//!     Ok((b, a))
//! }
//!
//! # fn example() -> webwin_runtime::Result<()> {
//! let mut builder = Bridge::builder();
//! builder.expose_function(swap, None)?;
//!
//! let mut window = Window::new(MemoryChannel::new(), WindowConfig::default(), builder.build()?);
//! window.show_html("<html><head></head><body></body></html>", ShowOptions::default())?;
//!
//! let res = window.channel().invoke("swap", r#"["x","y"]"#)?;
//! assert_eq!(res, r#"{"status":"succ","retval":["y","x"]}"#);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Front end
//!
//! ```javascript
//! const [a, b] = await webwin.swap("x", "y");
//! const msg = await webwin.world.hello("bob");
//! ```

pub mod bridge;
pub mod callable;
pub mod channel;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod window;

#[cfg(test)]
mod tests;

pub use bridge::{Bridge, BridgeBuilder, Exposable, Function};
pub use callable::{CallableFn, IntoCallable};
pub use channel::{Channel, ChannelHandler, MemoryChannel, ScriptResult};
pub use dispatcher::Dispatcher;
pub use envelope::{CallRequest, CallResponse};
pub use error::{BridgeError, CallError, Result};
pub use window::{ShowOptions, Window};

/// Version of the runtime, published as `webwin._version_` by default
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
