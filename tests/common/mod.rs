#![allow(dead_code)]
use bastos::mach::{Config, Event, MemoryDisk, Runtime, Transcript};

pub struct Machine {
    pub runtime: Runtime,
    pub screen: Transcript,
    pub disk: MemoryDisk,
}

pub fn machine() -> Machine {
    machine_with(Config::default())
}

pub fn machine_with(config: Config) -> Machine {
    let screen = Transcript::new();
    let disk = MemoryDisk::new();
    let config = Config {
        seed: Some(7),
        ..config
    };
    let runtime = Runtime::new(config)
        .with_output(screen.clone())
        .with_disk(disk.clone());
    Machine {
        runtime,
        screen,
        disk,
    }
}

impl Machine {
    /// Enters lines that must be accepted.
    pub fn enter(&mut self, lines: &[&str]) {
        for line in lines {
            if let Err(error) = self.runtime.enter(line) {
                panic!("{:?} rejected: {}", line, error);
            }
        }
    }

    pub fn exec(&mut self) -> String {
        self.exec_n(5000)
    }

    /// Runs until the machine stops or waits for input, collecting the
    /// screen and any error as the terminal would show it.
    pub fn exec_n(&mut self, cycles: usize) -> String {
        let mut s = String::new();
        let mut prev_running = false;
        loop {
            let event = self.runtime.execute(cycles);
            s.push_str(&self.screen.take());
            match event {
                Event::Stopped | Event::Input => break,
                Event::Error(error) => {
                    s.push_str(&format!("?{}\n", error));
                    break;
                }
                Event::Running => {
                    if prev_running {
                        s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                        break;
                    }
                    prev_running = true;
                }
            }
        }
        s
    }

    /// Enters one direct line and runs it.
    pub fn run(&mut self, line: &str) -> String {
        match self.runtime.enter(line) {
            Ok(()) => self.exec(),
            Err(error) => format!("?{}\n", error),
        }
    }
}
