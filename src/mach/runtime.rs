use super::eval;
use super::io::{MemoryDisk, Output, Persistence, Transcript};
use super::tty::TerminalProfile;
use super::{Config, Program, Stack, Val, Var};
use crate::error;
use crate::lang::{tokenize, Error, ErrorCode, Line, LineNumber, MAX_LINE_LEN};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// ## Run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Halted,
    Running,
    AwaitingInput,
}

/// ## Events for the host
///
/// Returned by `execute` to tell the host what to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Nothing is running. Read a command.
    Stopped,
    /// Cycles ran out. Call `execute` again.
    Running,
    /// INPUT is waiting. The prompt is already printed.
    Input,
    /// Execution halted on this error.
    Error(Error),
}

/// An active FOR, held in the slot of its single letter variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForLoop {
    pub limit: f32,
    pub step: f32,
    pub line: u16,
}

#[derive(Debug)]
pub(super) struct PendingInput {
    key: String,
    line: LineNumber,
    resume: bool,
}

/// ## Virtual machine
///
/// Owns both indexes and all run state. Nothing is global, so any number
/// of machines can run side by side.
pub struct Runtime {
    pub(super) program: Program,
    pub(super) vars: Var,
    pub(super) state: State,
    pub(super) pc: Option<u16>,
    pub(super) cont: Option<u16>,
    pub(super) line: LineNumber,
    pub(super) redirected: bool,
    pub(super) loops: [Option<ForLoop>; 26],
    pub(super) gosub: Stack<u16>,
    pub(super) input: Option<PendingInput>,
    pub(super) output: Box<dyn Output>,
    pub(super) disk: Box<dyn Persistence>,
    pub(super) terminal: Box<dyn TerminalProfile>,
    pub(super) rng: StdRng,
    direct: Option<Vec<u8>>,
    interrupted: bool,
    keys: Vec<u8>,
    last_key: u8,
    overflowed: bool,
    config: Config,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Runtime {
            program: Program::new(),
            vars: Var::new(config.max_variables),
            state: State::Halted,
            pc: None,
            cont: None,
            line: None,
            redirected: false,
            loops: [None; 26],
            gosub: Stack::new(
                config.gosub_depth,
                ErrorCode::GosubStackOverflow,
                ErrorCode::ReturnWithoutGosub,
            ),
            input: None,
            output: Box::new(Transcript::new()),
            disk: Box::new(MemoryDisk::new()),
            terminal: config.terminal.profile(),
            rng,
            direct: None,
            interrupted: false,
            keys: Vec::with_capacity(MAX_LINE_LEN),
            last_key: 0,
            overflowed: false,
            config,
        }
    }

    pub fn with_output<T: Output + 'static>(mut self, output: T) -> Runtime {
        self.output = Box::new(output);
        self
    }

    pub fn with_disk<T: Persistence + 'static>(mut self, disk: T) -> Runtime {
        self.disk = Box::new(disk);
        self
    }

    pub fn with_terminal<T: TerminalProfile + 'static>(mut self, terminal: T) -> Runtime {
        self.terminal = Box::new(terminal);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Looks up a variable by name, `A` or `A$`, in any case.
    pub fn var(&self, name: &str) -> Option<&Val> {
        self.vars.find(&name.to_ascii_uppercase())
    }

    /// Stops a running program at the next opportunity.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Accepts one line of text from the host.
    ///
    /// While INPUT waits this is the data. Otherwise a numbered line is
    /// checked and stored (or deleted when nothing follows the number)
    /// and a direct line is checked and queued for the next `execute`.
    /// A line that fails its check changes nothing.
    pub fn enter(&mut self, text: &str) -> Result<(), Error> {
        if let Some(pending) = self.input.take() {
            return self.receive(pending, text);
        }
        let (number, tokens) = tokenize(text)?;
        match number {
            Some(n) if tokens.is_empty() => {
                if self.program.remove(n).is_some() {
                    debug!(line = n, "deleted");
                }
            }
            Some(n) => {
                eval::check(self, number, &tokens)?;
                self.program.insert(Line::new(n, &tokens));
                debug!(line = n, len = tokens.len(), "stored");
            }
            None if tokens.is_empty() => {}
            None => {
                eval::check(self, None, &tokens)?;
                self.direct = Some(tokens);
            }
        }
        Ok(())
    }

    fn receive(&mut self, pending: PendingInput, text: &str) -> Result<(), Error> {
        let PendingInput { key, line, resume } = pending;
        let text = text.trim_end_matches(|c: char| c == '\r' || c == '\n');
        let value = if key.ends_with('$') {
            Ok(Val::String(text.to_string()))
        } else {
            text.trim()
                .parse::<f32>()
                .map(Val::Number)
                .map_err(|_| error!(SyntaxError))
        };
        if let Err(e) = value.and_then(|value| self.vars.store(key, value)) {
            let e = e.in_line_number(line);
            self.fail(e.clone());
            return Err(e);
        }
        self.state = if resume {
            State::Running
        } else {
            State::Halted
        };
        Ok(())
    }

    /// Runs the queued direct line, then up to `cycles` program lines.
    ///
    /// A direct line that fails while a program runs is reported and the
    /// program carries on. Only a direct STOP halts it.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(tokens) = self.direct.take() {
            if let Err(e) = eval::run(self, None, &tokens) {
                if self.state != State::Running {
                    return self.fail(e);
                }
                if !e.is(ErrorCode::Break) {
                    debug!(error = %e, "direct line failed");
                    return Event::Error(e);
                }
                self.cont = self.pc;
                return self.fail(e);
            }
        }
        if self.interrupted {
            self.interrupted = false;
            match self.state {
                State::Running => {
                    self.cont = self.pc;
                    return self.fail(error!(Break, self.line));
                }
                State::AwaitingInput => {
                    let line = self.input.as_ref().and_then(|pending| pending.line);
                    self.cont = line;
                    return self.fail(error!(Break, line));
                }
                State::Halted => {}
            }
        }
        for _ in 0..cycles {
            match self.state {
                State::Running => {}
                State::AwaitingInput => return Event::Input,
                State::Halted => return Event::Stopped,
            }
            if let Err(e) = self.step() {
                return self.fail(e);
            }
        }
        match self.state {
            State::Running => Event::Running,
            State::AwaitingInput => Event::Input,
            State::Halted => Event::Stopped,
        }
    }

    fn step(&mut self) -> Result<(), Error> {
        let number = match self.pc {
            Some(number) => number,
            None => {
                self.halt();
                return Ok(());
            }
        };
        let tokens = match self.program.find(number) {
            Some(line) => line.tokens().clone(),
            None => return Err(error!(UndefinedLine, self.line)),
        };
        self.line = Some(number);
        self.redirected = false;
        eval::run(self, Some(number), &tokens)?;
        if !self.redirected {
            self.pc = self.program.next(number).map(Line::number);
        }
        if self.state == State::Running && self.pc.is_none() {
            self.halt();
        }
        Ok(())
    }

    fn fail(&mut self, error: Error) -> Event {
        if !error.is(ErrorCode::Break) && !error.is_direct() {
            self.cont = None;
        }
        debug!(%error, "halted");
        self.state = State::Halted;
        self.pc = None;
        self.input = None;
        Event::Error(error)
    }

    fn halt(&mut self) {
        if self.state != State::Halted {
            debug!(line = ?self.line, "halted");
        }
        self.state = State::Halted;
    }

    pub(super) fn await_input(&mut self, key: String, line: LineNumber) {
        let resume = self.state == State::Running;
        self.input = Some(PendingInput { key, line, resume });
        self.state = State::AwaitingInput;
        debug!(?line, "awaiting input");
    }

    /// CLEAR: variables, loops, GOSUB stack and pending input.
    pub(super) fn clear(&mut self) {
        self.vars.clear();
        self.loops = [None; 26];
        self.gosub.clear();
        self.input = None;
    }

    /// NEW: everything, and halt.
    pub(super) fn new_program(&mut self) {
        self.program.clear();
        self.clear();
        self.cont = None;
        self.pc = None;
        self.halt();
    }

    /// Feeds raw keyboard bytes. CR or LF submits the line, DEL and BS
    /// erase, Ctrl-C interrupts. Errors are printed as `?MESSAGE`.
    pub fn send_keys(&mut self, keys: &[u8]) {
        for &key in keys {
            match key {
                b'\n' if self.last_key == b'\r' => {}
                b'\r' | b'\n' => self.submit(),
                0x7F | 0x08 => {
                    self.keys.pop();
                }
                0x03 => self.interrupt(),
                0x00..=0x1F => {}
                _ if self.keys.len() >= MAX_LINE_LEN => self.overflowed = true,
                _ => self.keys.push(key),
            }
            self.last_key = key;
        }
    }

    fn submit(&mut self) {
        let line = String::from_utf8_lossy(&self.keys).into_owned();
        self.keys.clear();
        if std::mem::replace(&mut self.overflowed, false) {
            self.report(&error!(LineBufferOverflow));
            return;
        }
        if let Err(e) = self.enter(&line) {
            self.report(&e);
        }
    }

    /// One host tick: runs up to the configured number of statements.
    pub fn tick(&mut self) -> Event {
        let event = self.execute(self.config.cycles);
        if let Event::Error(e) = &event {
            self.report(e);
        }
        event
    }

    fn report(&mut self, error: &Error) {
        self.output.print_string(&format!("?{}\n", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> (Runtime, Transcript) {
        let transcript = Transcript::new();
        let config = Config {
            seed: Some(1),
            ..Config::default()
        };
        (Runtime::new(config).with_output(transcript.clone()), transcript)
    }

    #[test]
    fn test_checked_before_stored() {
        let (mut r, _) = runtime();
        r.enter("10 PRINT 1").unwrap();
        assert!(r.enter("10 PRINT +").is_err());
        assert_eq!(r.program().find(10).unwrap().to_string(), "10 PRINT 1");
        assert!(r.enter("20 GOTO").is_err());
        assert!(r.program().find(20).is_none());
    }

    #[test]
    fn test_direct_check_has_no_effect() {
        let (mut r, t) = runtime();
        assert!(r.enter("A = 1 +").is_err());
        assert!(r.var("A").is_none());
        assert_eq!(r.execute(10), Event::Stopped);
        assert_eq!(t.take(), "");
    }

    #[test]
    fn test_keys() {
        let (mut r, t) = runtime();
        r.send_keys(b"PRINT 12\x083\r\n");
        assert_eq!(r.tick(), Event::Stopped);
        assert_eq!(t.take(), "13\n");
        r.send_keys(b"PRINT +\r");
        assert_eq!(t.take(), "?SYNTAX ERROR\n");
        r.send_keys(&[b'X'; 300]);
        r.send_keys(b"\n");
        assert_eq!(t.take(), "?LINE BUFFER OVERFLOW\n");
    }

    #[test]
    fn test_direct_error_while_running() {
        let (mut r, t) = runtime();
        r.enter("10 A=A+1").unwrap();
        r.enter("20 GOTO 10").unwrap();
        r.enter("RUN").unwrap();
        assert_eq!(r.execute(10), Event::Running);
        r.send_keys(b"GOTO 999\r");
        assert_eq!(r.tick(), Event::Error(error!(UndefinedLine)));
        assert_eq!(t.take(), "?UNDEFINED LINE\n");
        assert_eq!(r.state(), State::Running);
        assert_eq!(r.execute(10), Event::Running);
        r.send_keys(b"STOP\r");
        assert_eq!(r.tick(), Event::Error(error!(Break)));
        assert_eq!(r.state(), State::Halted);
        r.enter("CONT").unwrap();
        assert_eq!(r.execute(10), Event::Running);
    }

    #[test]
    fn test_interrupt() {
        let (mut r, t) = runtime();
        r.enter("10 GOTO 10").unwrap();
        r.enter("RUN").unwrap();
        assert_eq!(r.execute(100), Event::Running);
        r.send_keys(&[0x03]);
        assert_eq!(r.tick(), Event::Error(error!(Break, Some(10))));
        assert_eq!(t.take(), "?BREAK IN 10\n");
        assert_eq!(r.state(), State::Halted);
        r.enter("CONT").unwrap();
        assert_eq!(r.execute(10), Event::Running);
    }
}
