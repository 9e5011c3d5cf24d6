//! SAVE and LOAD image.
//!
//! Two length-prefixed blocks, program then variables, each holding the
//! stored encodings verbatim:
//!
//! ```text
//! u32 length, then per line:     u16 number, u16 length, token bytes
//! u32 length, then per variable: u8 name length, name, u8 kind,
//!                                f32 (kind 0) or u16 length + bytes (kind 1)
//! ```
//!
//! All integers are little endian.

use super::io::{Handle, Mode, Persistence};
use super::var::{self, Var};
use super::{Program, Val};
use crate::error;
use crate::lang::{Error, Line, MAX_LINE_LEN};
use std::convert::TryFrom;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, Error>;

const NUMBER: u8 = 0;
const STRING: u8 = 1;

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(error!(BadFileName));
    }
    Ok(())
}

pub fn save(program: &Program, vars: &Var, disk: &mut dyn Persistence, name: &str) -> Result<()> {
    check_name(name)?;
    let image = encode(program, vars)?;
    let handle = disk.open(name, Mode::Write)?;
    let written = disk.write(handle, &image);
    let closed = disk.close(handle);
    if written? != image.len() {
        warn!(name, "short write");
        return Err(error!(DiskIoError));
    }
    closed?;
    info!(name, bytes = image.len(), "saved");
    Ok(())
}

/// Reads an image into `program` and `vars`, which should be empty.
/// The whole image is decoded first, so a bad file changes neither.
pub fn load(program: &mut Program, vars: &mut Var, disk: &mut dyn Persistence, name: &str) -> Result<()> {
    check_name(name)?;
    let handle = disk.open(name, Mode::Read)?;
    let result = read_image(disk, handle);
    let closed = disk.close(handle);
    let (lines, table) = result?;
    closed?;
    for line in lines {
        program.insert(line);
    }
    for (key, value) in table {
        vars.store(key, value)?;
    }
    info!(name, lines = program.len(), vars = vars.len(), "loaded");
    Ok(())
}

pub fn erase(disk: &mut dyn Persistence, name: &str) -> Result<()> {
    check_name(name)?;
    disk.erase(name)?;
    info!(name, "erased");
    Ok(())
}

pub fn encode(program: &Program, vars: &Var) -> Result<Vec<u8>> {
    let mut lines = vec![];
    for line in program.lines() {
        lines.extend_from_slice(&line.number().to_le_bytes());
        lines.extend_from_slice(&(line.len() as u16).to_le_bytes());
        lines.extend_from_slice(line.tokens());
    }
    let mut table = vec![];
    for (key, val) in vars.iter() {
        let len = u8::try_from(key.len()).map_err(|_| error!(DiskIoError))?;
        table.push(len);
        table.extend_from_slice(key.as_bytes());
        match val {
            Val::Number(n) => {
                table.push(NUMBER);
                table.extend_from_slice(&n.to_le_bytes());
            }
            Val::String(s) => {
                let len = u16::try_from(s.len()).map_err(|_| error!(DiskIoError))?;
                table.push(STRING);
                table.extend_from_slice(&len.to_le_bytes());
                table.extend_from_slice(s.as_bytes());
            }
        }
    }
    let mut image = Vec::with_capacity(8 + lines.len() + table.len());
    for block in [lines, table].iter() {
        let len = u32::try_from(block.len()).map_err(|_| error!(DiskIoError))?;
        image.extend_from_slice(&len.to_le_bytes());
        image.extend_from_slice(block);
    }
    Ok(image)
}

fn read_image(disk: &mut dyn Persistence, handle: Handle) -> Result<(Vec<Line>, Vec<(String, Val)>)> {
    let lines = decode_lines(&read_block(disk, handle)?)?;
    let table = decode_vars(&read_block(disk, handle)?)?;
    let mut extra = [0u8; 1];
    if disk.read(handle, &mut extra)? != 0 {
        warn!("trailing bytes after image");
        return Err(error!(DiskIoError));
    }
    Ok((lines, table))
}

fn read_exact(disk: &mut dyn Persistence, handle: Handle, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match disk.read(handle, &mut buf[filled..])? {
            0 => return Err(error!(InputPastEnd)),
            n => filled += n,
        }
    }
    Ok(())
}

fn read_block(disk: &mut dyn Persistence, handle: Handle) -> Result<Vec<u8>> {
    let mut len = [0u8; 4];
    read_exact(disk, handle, &mut len)?;
    let len = u32::from_le_bytes(len) as usize;
    // Grow as bytes arrive. A corrupt length must not allocate.
    let mut block = Vec::new();
    let mut chunk = [0u8; 256];
    while block.len() < len {
        let want = (len - block.len()).min(chunk.len());
        read_exact(disk, handle, &mut chunk[..want])?;
        block.extend_from_slice(&chunk[..want]);
    }
    Ok(block)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Reader<'a> {
        Reader { bytes, pos: 0 }
    }

    fn is_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        match self.bytes.get(self.pos..end) {
            Some(slice) => {
                self.pos = end;
                Ok(slice)
            }
            None => Err(error!(DiskIoError)),
        }
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

fn decode_lines(bytes: &[u8]) -> Result<Vec<Line>> {
    let mut lines = vec![];
    let mut reader = Reader::new(bytes);
    while !reader.is_end() {
        let number = reader.u16()?;
        let len = reader.u16()? as usize;
        if number == 0 || len == 0 || len > MAX_LINE_LEN {
            return Err(error!(DiskIoError));
        }
        lines.push(Line::new(number, reader.take(len)?));
    }
    Ok(lines)
}

fn decode_vars(bytes: &[u8]) -> Result<Vec<(String, Val)>> {
    let mut table = vec![];
    let mut reader = Reader::new(bytes);
    while !reader.is_end() {
        let len = reader.u8()? as usize;
        let key = std::str::from_utf8(reader.take(len)?).map_err(|_| error!(DiskIoError))?;
        let value = match reader.u8()? {
            NUMBER => Val::Number(reader.f32()?),
            STRING => {
                let len = reader.u16()? as usize;
                let s = std::str::from_utf8(reader.take(len)?).map_err(|_| error!(DiskIoError))?;
                Val::String(s.to_string())
            }
            _ => return Err(error!(DiskIoError)),
        };
        if key.is_empty() || key.ends_with('$') != value.is_string() {
            return Err(error!(DiskIoError));
        }
        if let Val::String(s) = &value {
            var::check_length(s).map_err(|_| error!(DiskIoError))?;
        }
        table.push((key.to_string(), value));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::io::MemoryDisk;

    fn sample() -> (Program, Var) {
        let mut program = Program::new();
        for s in &["10 PRINT \"HI\"", "20 GOTO 10"] {
            if let (_, Some(line)) = Line::parse(s).unwrap() {
                program.insert(line);
            }
        }
        let mut vars = Var::default();
        vars.store_number("A", 1.5).unwrap();
        vars.store_string("A", "TEXT".to_string()).unwrap();
        (program, vars)
    }

    #[test]
    fn test_save_then_load() {
        let (program, vars) = sample();
        let mut disk = MemoryDisk::new();
        save(&program, &vars, &mut disk, "PROG").unwrap();
        let mut p = Program::new();
        let mut v = Var::default();
        load(&mut p, &mut v, &mut disk, "PROG").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.find(20).unwrap().to_string(), "20 GOTO 10");
        assert_eq!(v.fetch_number("A"), 1.5);
        assert_eq!(v.fetch_string("A"), "TEXT");
    }

    #[test]
    fn test_layout() {
        let mut program = Program::new();
        program.insert(Line::new(10, &[0x80]));
        let image = encode(&program, &Var::default()).unwrap();
        assert_eq!(image, vec![5, 0, 0, 0, 10, 0, 1, 0, 0x80, 0, 0, 0, 0]);
    }

    #[test]
    fn test_truncated() {
        let (program, vars) = sample();
        let mut image = encode(&program, &vars).unwrap();
        image.truncate(image.len() - 3);
        let mut disk = MemoryDisk::new();
        disk.put_file("BAD", image);
        let mut p = Program::new();
        let mut v = Var::default();
        let e = load(&mut p, &mut v, &mut disk, "BAD").unwrap_err();
        assert!(e.is(ErrorCode::InputPastEnd));
    }

    #[test]
    fn test_record_mismatch() {
        let mut disk = MemoryDisk::new();
        disk.put_file("BAD", vec![3, 0, 0, 0, 10, 0, 9, 0, 0, 0, 0]);
        let e = load(&mut Program::new(), &mut Var::default(), &mut disk, "BAD").unwrap_err();
        assert!(e.is(ErrorCode::DiskIoError));
    }

    #[test]
    fn test_trailing_bytes() {
        let (program, vars) = sample();
        let mut image = encode(&program, &vars).unwrap();
        image.extend_from_slice(b"GARBAGE");
        let mut disk = MemoryDisk::new();
        disk.put_file("BAD", image);
        let mut p = Program::new();
        let mut v = Var::default();
        let e = load(&mut p, &mut v, &mut disk, "BAD").unwrap_err();
        assert!(e.is(ErrorCode::DiskIoError));
        assert!(p.is_empty());
        assert!(v.is_empty());
    }

    #[test]
    fn test_names() {
        let mut disk = MemoryDisk::new();
        let e = load(&mut Program::new(), &mut Var::default(), &mut disk, "NONE").unwrap_err();
        assert!(e.is(ErrorCode::FileNotFound));
        let e = erase(&mut disk, "").unwrap_err();
        assert!(e.is(ErrorCode::BadFileName));
    }
}
