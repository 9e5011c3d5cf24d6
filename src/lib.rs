//! # Bastos
//!
//! A tiny line-numbered BASIC for memory-constrained terminals.
//!
//! Lines are tokenized once, when they are typed, into a compact byte
//! encoding. The evaluator runs straight from those bytes. Program lines
//! and variables are kept in AVL trees.
//!
//! Install with `cargo install bastos` then run `bastos` in a terminal.
//! ```text
//! BASTOS 0.3.0
//! READY.
//! █
//! ```
//!
//! The machine itself has no terminal or filesystem of its own. Output,
//! storage and terminal escapes are traits, so a `Runtime` can be driven
//! from a test, a serial line or anything else that delivers keys.
//! ```
//! use bastos::mach::{Event, Runtime, Transcript};
//!
//! let transcript = Transcript::new();
//! let mut runtime = Runtime::default().with_output(transcript.clone());
//! runtime.enter("10 PRINT 2+3*4").unwrap();
//! runtime.enter("RUN").unwrap();
//! assert_eq!(runtime.execute(100), Event::Stopped);
//! assert_eq!(transcript.take(), "14\n");
//! ```

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/chapter_1.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_1;

#[path = "doc/chapter_2.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_2;

#[path = "doc/chapter_3.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_3;

pub mod lang;
pub mod mach;
pub mod term;
