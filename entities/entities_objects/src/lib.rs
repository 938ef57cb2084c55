//! Entities Layer: Interpreter Objects
//!
//! Provides the minimal slice of the interpreter's object model that the socket
//! binding needs: dynamic values passed in and out of the `socket` module, the
//! exceptions raised back to scripts, and native error numbers.
//!
//! ## Overview
//!
//! The `entities_objects` crate is the innermost layer of the workspace and has
//! no dependencies on other crates in the system. Higher layers (the socket and
//! resolver adapters, the module facade) exchange values through it.
//!
//! ## Modules
//!
//! - **[`obj`](obj/index.html)**: The [`Obj`] enum and the argument accessors
//!   used at the interpreter boundary (`get_int`, `get_str`,
//!   `get_array_fixed_n`).
//! - **[`error`](error/index.html)**: [`ObjError`], the exception kinds a
//!   binding call can raise, and [`Errno`], a native error number carried
//!   verbatim.
//!
//! ## Usage
//!
//! ```rust
//! use entities_objects::{Obj, ObjError, Errno};
//!
//! let addr = Obj::tuple(vec![Obj::from("127.0.0.1"), Obj::from(8080)]);
//! let items = addr.get_array_fixed_n(2).unwrap();
//! assert_eq!(items[1].get_int().unwrap(), 8080);
//!
//! let err = ObjError::os(Errno::EBADF);
//! assert_eq!(err.errno(), Some(Errno::EBADF));
//! ```

pub mod error;
pub mod obj;

pub use error::{Errno, ObjError};
pub use obj::Obj;
