//! Collaborators the machine talks to: where text goes and where
//! programs are kept. Both have in-memory implementations so a `Runtime`
//! can run without a terminal or a filesystem.

use super::operation::format_g;
use crate::error;
use crate::lang::Error;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerFormat {
    /// `%u ` as in front of a listed line.
    Spaced,
    /// `%u` then end of line.
    Line,
}

impl IntegerFormat {
    pub fn apply(self, i: i32) -> String {
        match self {
            IntegerFormat::Spaced => format!("{} ", i),
            IntegerFormat::Line => format!("{}\n", i),
        }
    }
}

/// The machine never writes bytes itself. Everything goes through here.
pub trait Output {
    fn print_string(&mut self, s: &str);

    fn print_float(&mut self, n: f32) {
        self.print_string(&format_g(n));
    }

    fn print_integer(&mut self, format: IntegerFormat, i: i32) {
        self.print_string(&format.apply(i));
    }
}

/// Collects output in a shared string. Clones see the same text.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<String>>);

impl Transcript {
    pub fn new() -> Transcript {
        Transcript::default()
    }

    /// Everything printed since the last take.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl Output for Transcript {
    fn print_string(&mut self, s: &str) {
        self.0.borrow_mut().push_str(s);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

pub trait Persistence {
    fn open(&mut self, name: &str, mode: Mode) -> Result<Handle>;
    fn close(&mut self, handle: Handle) -> Result<()>;
    /// Returns how many bytes were read. Zero is end of file.
    fn read(&mut self, handle: Handle, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, handle: Handle, buf: &[u8]) -> Result<usize>;
    fn erase(&mut self, name: &str) -> Result<()>;
    /// File names and sizes.
    fn catalog(&mut self) -> Result<Vec<(String, u64)>>;
}

#[derive(Debug)]
struct OpenFile {
    name: String,
    mode: Mode,
    data: Vec<u8>,
    pos: usize,
}

/// Files kept in memory. Clones share the same files but not open
/// handles.
#[derive(Debug, Default)]
pub struct MemoryDisk {
    files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    open: HashMap<Handle, OpenFile>,
    next_handle: u32,
}

impl Clone for MemoryDisk {
    fn clone(&self) -> MemoryDisk {
        MemoryDisk {
            files: Rc::clone(&self.files),
            open: HashMap::new(),
            next_handle: 0,
        }
    }
}

impl MemoryDisk {
    pub fn new() -> MemoryDisk {
        MemoryDisk::default()
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(name).cloned()
    }

    pub fn put_file(&self, name: &str, data: Vec<u8>) {
        self.files.borrow_mut().insert(name.to_string(), data);
    }

    fn handle(&mut self, handle: Handle) -> Result<&mut OpenFile> {
        self.open
            .get_mut(&handle)
            .ok_or_else(|| error!(DiskIoError; "BAD HANDLE"))
    }
}

impl Persistence for MemoryDisk {
    fn open(&mut self, name: &str, mode: Mode) -> Result<Handle> {
        let data = match mode {
            Mode::Read => match self.files.borrow().get(name) {
                Some(data) => data.clone(),
                None => return Err(error!(FileNotFound)),
            },
            Mode::Write => vec![],
        };
        self.next_handle += 1;
        let handle = Handle(self.next_handle);
        self.open.insert(
            handle,
            OpenFile {
                name: name.to_string(),
                mode,
                data,
                pos: 0,
            },
        );
        Ok(handle)
    }

    fn close(&mut self, handle: Handle) -> Result<()> {
        let file = match self.open.remove(&handle) {
            Some(file) => file,
            None => return Err(error!(DiskIoError; "BAD HANDLE")),
        };
        if file.mode == Mode::Write {
            self.files.borrow_mut().insert(file.name, file.data);
        }
        Ok(())
    }

    fn read(&mut self, handle: Handle, buf: &mut [u8]) -> Result<usize> {
        let file = self.handle(handle)?;
        let rest = file.data.get(file.pos..).unwrap_or_default();
        let count = rest.len().min(buf.len());
        buf[..count].copy_from_slice(&rest[..count]);
        file.pos += count;
        Ok(count)
    }

    fn write(&mut self, handle: Handle, buf: &[u8]) -> Result<usize> {
        let file = self.handle(handle)?;
        if file.mode != Mode::Write {
            return Err(error!(DiskIoError));
        }
        file.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn erase(&mut self, name: &str) -> Result<()> {
        match self.files.borrow_mut().remove(name) {
            Some(_) => Ok(()),
            None => Err(error!(FileNotFound)),
        }
    }

    fn catalog(&mut self) -> Result<Vec<(String, u64)>> {
        Ok(self
            .files
            .borrow()
            .iter()
            .map(|(name, data)| (name.clone(), data.len() as u64))
            .collect())
    }
}
