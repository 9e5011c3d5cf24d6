/*!
## Terminal host

Line editing with `linefeed`, Ctrl-C through `ctrlc`, programs saved as
files in the directory named by `BASTOS_DISK`.

*/

extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;

mod disk;

pub use disk::FileDisk;

use crate::lang::Error;
use crate::mach::{Config, Event, Output, Runtime};
use ansi_term::Style;
use linefeed::{Completer, Completion, DefaultTerminal, Interface, Prompter, ReadResult, Signal, Terminal};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        warn!(%error, "no Ctrl-C handler");
    }
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let config = Config::from_vars(std::env::vars());
    let cycles = config.cycles;
    let interface = Arc::new(Interface::new("BASTOS")?);
    interface.set_report_signal(Signal::Interrupt, true);
    let mut runtime = Runtime::new(config.clone())
        .with_output(Console(interface.clone()))
        .with_disk(FileDisk::new(config.disk));
    interface.write_fmt(format_args!("BASTOS {}\n", env!("CARGO_PKG_VERSION")))?;
    let mut print_ready = true;

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(cycles) {
            Event::Stopped => {
                if print_ready {
                    print_ready = false;
                    interface.write_fmt(format_args!("READY.\n"))?;
                }
                let saved_completer = interface.completer();
                interface.set_completer(Arc::new(LineCompleter::new(&runtime)));
                let read = interface.read_line()?;
                interface.set_completer(saved_completer);
                match read {
                    ReadResult::Input(string) => {
                        let direct = !string.trim_start().starts_with(|c: char| c.is_ascii_digit());
                        match runtime.enter(&string) {
                            Ok(()) => interface.add_history_unique(string),
                            Err(error) => print_error(&interface, &error)?,
                        }
                        print_ready = direct;
                    }
                    ReadResult::Signal(Signal::Interrupt) => {
                        interface.set_buffer("")?;
                        interface.write_fmt(format_args!("\n"))?;
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                }
            }
            Event::Input => match interface.read_line()? {
                ReadResult::Input(string) => {
                    if let Err(error) = runtime.enter(&string) {
                        print_error(&interface, &error)?;
                    }
                }
                ReadResult::Signal(Signal::Interrupt) => {
                    interface.set_buffer("")?;
                    interface.lock_reader().cancel_read_line()?;
                    runtime.interrupt();
                }
                ReadResult::Signal(_) | ReadResult::Eof => break,
            },
            Event::Error(error) => {
                print_error(&interface, &error)?;
                print_ready = true;
            }
            Event::Running => {}
        }
    }
    Ok(())
}

fn print_error(interface: &Interface<DefaultTerminal>, error: &Error) -> std::io::Result<()> {
    interface.write_fmt(format_args!(
        "{}\n",
        Style::new().bold().paint(format!("?{}", error))
    ))
}

/// PRINT and LIST output, written above the edit line.
struct Console(Arc<Interface<DefaultTerminal>>);

impl Output for Console {
    fn print_string(&mut self, s: &str) {
        if let Err(error) = self.0.write_fmt(format_args!("{}", s)) {
            warn!(%error, "console write failed");
        }
    }
}

/// Typing a line number then TAB brings back that line for editing.
struct LineCompleter {
    lines: BTreeMap<u16, String>,
}

impl LineCompleter {
    fn new(runtime: &Runtime) -> LineCompleter {
        LineCompleter {
            lines: runtime
                .program()
                .lines()
                .map(|line| (line.number(), line.to_string()))
                .collect(),
        }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let number = prompter.buffer().trim().parse::<u16>().ok()?;
        let line = self.lines.get(&number)?;
        let mut completion = Completion::simple(line.clone());
        completion.suffix = linefeed::complete::Suffix::None;
        Some(vec![completion])
    }
}
