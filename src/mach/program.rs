use super::avl::AvlTree;
use crate::lang::Line;

/// ## Program memory
///
/// Stored lines indexed by line number.

#[derive(Debug, Default)]
pub struct Program {
    lines: AvlTree<u16, Line>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stores a line, handing back the one it replaced.
    pub fn insert(&mut self, line: Line) -> Option<Line> {
        self.lines.insert(line.number(), line)
    }

    pub fn remove(&mut self, number: u16) -> Option<Line> {
        self.lines.remove(&number)
    }

    pub fn find(&self, number: u16) -> Option<&Line> {
        self.lines.find(&number)
    }

    pub fn first(&self) -> Option<&Line> {
        self.lines.first().map(|(_, line)| line)
    }

    /// The first stored line after `number`, which need not exist.
    pub fn next(&self, number: u16) -> Option<&Line> {
        self.lines.next(&number).map(|(_, line)| line)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().map(|(_, line)| line)
    }
}
