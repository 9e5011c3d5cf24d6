use crate::error;
use crate::lang::Error;
use crate::mach::{Handle, Mode, Persistence};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use tracing::warn;

type Result<T> = std::result::Result<T, Error>;

/// Persistence over plain files in one directory.
#[derive(Debug)]
pub struct FileDisk {
    dir: PathBuf,
    open: HashMap<Handle, File>,
    next_handle: u32,
}

impl FileDisk {
    pub fn new<P: Into<PathBuf>>(dir: P) -> FileDisk {
        FileDisk {
            dir: dir.into(),
            open: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Names stay inside the directory.
    fn path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.starts_with('.') || name.contains(|c: char| c == '/' || c == '\\') {
            return Err(error!(BadFileName));
        }
        Ok(self.dir.join(name))
    }

    fn file(&mut self, handle: Handle) -> Result<&mut File> {
        self.open
            .get_mut(&handle)
            .ok_or_else(|| error!(DiskIoError; "BAD HANDLE"))
    }
}

fn io_error(error: std::io::Error) -> Error {
    match error.kind() {
        ErrorKind::NotFound => error!(FileNotFound),
        _ => {
            warn!(%error, "disk");
            error!(DiskIoError)
        }
    }
}

impl Persistence for FileDisk {
    fn open(&mut self, name: &str, mode: Mode) -> Result<Handle> {
        let path = self.path(name)?;
        let file = match mode {
            Mode::Read => File::open(path),
            Mode::Write => File::create(path),
        }
        .map_err(io_error)?;
        self.next_handle += 1;
        let handle = Handle(self.next_handle);
        self.open.insert(handle, file);
        Ok(handle)
    }

    fn close(&mut self, handle: Handle) -> Result<()> {
        match self.open.remove(&handle) {
            Some(mut file) => file.flush().map_err(io_error),
            None => Err(error!(DiskIoError; "BAD HANDLE")),
        }
    }

    fn read(&mut self, handle: Handle, buf: &mut [u8]) -> Result<usize> {
        self.file(handle)?.read(buf).map_err(io_error)
    }

    fn write(&mut self, handle: Handle, buf: &[u8]) -> Result<usize> {
        self.file(handle)?.write(buf).map_err(io_error)
    }

    fn erase(&mut self, name: &str) -> Result<()> {
        let path = self.path(name)?;
        fs::remove_file(path).map_err(io_error)
    }

    fn catalog(&mut self) -> Result<Vec<(String, u64)>> {
        let mut files = vec![];
        for entry in fs::read_dir(&self.dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let metadata = entry.metadata().map_err(io_error)?;
            if !metadata.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    files.push((name.to_string(), metadata.len()));
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_bad_names() {
        let mut disk = FileDisk::new(".");
        for name in &["", "../X", "a/b", "a\\b", ".hidden"] {
            let e = disk.open(name, Mode::Read).unwrap_err();
            assert!(e.is(ErrorCode::BadFileName));
        }
    }

    #[test]
    fn test_missing_file() {
        let mut disk = FileDisk::new(std::env::temp_dir());
        let e = disk.open("BASTOS-NO-SUCH-FILE", Mode::Read).unwrap_err();
        assert!(e.is(ErrorCode::FileNotFound));
    }
}
