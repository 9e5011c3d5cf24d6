/*!
## Rust Machine Module

This Rust module stores and runs BASIC. Program lines and variables live
in AVL indexes; statements are evaluated straight from their tokens.

*/

mod avl;
mod config;
mod eval;
mod function;
mod io;
mod listing;
mod operation;
mod persist;
mod program;
mod runtime;
mod stack;
mod tty;
mod val;
mod var;

pub use avl::AvlTree;
pub use config::Config;
pub use function::Function;
pub use io::{Handle, IntegerFormat, MemoryDisk, Mode, Output, Persistence, Transcript};
pub use operation::{format_g, Operation};
pub use persist::encode;
pub use program::Program;
pub use runtime::{Event, ForLoop, Runtime, State};
pub use stack::Stack;
pub use tty::{TerminalKind, TerminalProfile, TtyRequest, Videotex, Vt100};
pub use val::Val;
pub use var::{Var, MAX_STRING_LEN};
