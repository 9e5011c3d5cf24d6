use super::tty::TerminalKind;
use std::path::PathBuf;
use tracing::warn;

/// Machine settings. Hosts fill this in; `Default` suits tests.
#[derive(Debug, Clone)]
pub struct Config {
    pub terminal: TerminalKind,
    /// Deepest GOSUB nesting before GOSUB STACK OVERFLOW.
    pub gosub_depth: usize,
    /// Variables allowed before OUT OF MEMORY.
    pub max_variables: usize,
    /// Fixed RND seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Statements run per host tick.
    pub cycles: usize,
    /// Where the terminal host keeps saved programs.
    pub disk: PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            terminal: TerminalKind::default(),
            gosub_depth: 32,
            max_variables: u16::max_value() as usize,
            seed: None,
            cycles: 5000,
            disk: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads `BASTOS_*` settings from name/value pairs such as
    /// `std::env::vars()`. Values that do not parse keep their default.
    pub fn from_vars<I, K, V>(vars: I) -> Config
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Config::default();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "BASTOS_TERMINAL" => match value.parse() {
                    Ok(kind) => config.terminal = kind,
                    Err(_) => warn!(value, "unknown terminal"),
                },
                "BASTOS_DISK" => config.disk = PathBuf::from(value),
                "BASTOS_SEED" => match value.parse() {
                    Ok(seed) => config.seed = Some(seed),
                    Err(_) => warn!(value, "bad seed"),
                },
                "BASTOS_GOSUB_DEPTH" => match value.parse() {
                    Ok(depth) => config.gosub_depth = depth,
                    Err(_) => warn!(value, "bad gosub depth"),
                },
                _ => {}
            }
        }
        config
    }
}
