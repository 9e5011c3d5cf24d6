use super::io::{IntegerFormat, Output, Persistence};
use super::Program;
use crate::lang::{untokenize, Error};

/// LIST: lines numbered `start` or later, at most `count` of them.
pub fn list(program: &Program, out: &mut dyn Output, start: u16, count: Option<usize>) {
    let lines = program
        .lines()
        .skip_while(|line| line.number() < start)
        .take(count.unwrap_or(usize::max_value()));
    for line in lines {
        out.print_integer(IntegerFormat::Spaced, i32::from(line.number()));
        out.print_string(&untokenize(line.tokens()));
        out.print_string("\n");
    }
}

/// CAT: every stored file with its size.
pub fn catalog(disk: &mut dyn Persistence, out: &mut dyn Output) -> Result<(), Error> {
    for (name, size) in disk.catalog()? {
        out.print_string(&format!("{:<16}", name));
        let size = if size > i32::max_value() as u64 {
            i32::max_value()
        } else {
            size as i32
        };
        out.print_integer(IntegerFormat::Line, size);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Line;
    use crate::mach::io::{MemoryDisk, Transcript};

    fn program(text: &[&str]) -> Program {
        let mut program = Program::new();
        for s in text {
            if let (_, Some(line)) = Line::parse(s).unwrap() {
                program.insert(line);
            }
        }
        program
    }

    #[test]
    fn test_list_range() {
        let p = program(&["30 rem c", "10 print 1", "20 goto 10", "40 stop"]);
        let t = Transcript::new();
        list(&p, &mut t.clone(), 0, None);
        assert_eq!(t.take(), "10 PRINT 1\n20 GOTO 10\n30 REM c\n40 STOP\n");
        list(&p, &mut t.clone(), 15, Some(2));
        assert_eq!(t.take(), "20 GOTO 10\n30 REM c\n");
        list(&p, &mut t.clone(), 50, None);
        assert_eq!(t.take(), "");
    }

    #[test]
    fn test_catalog() {
        let mut disk = MemoryDisk::new();
        disk.put_file("GAME", vec![0; 12]);
        disk.put_file("A-VERY-LONG-FILE-NAME", vec![]);
        let t = Transcript::new();
        catalog(&mut disk, &mut t.clone()).unwrap();
        assert_eq!(t.take(), "A-VERY-LONG-FILE-NAME0\nGAME            12\n");
    }
}
