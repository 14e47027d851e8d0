use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use cross_xdg::BaseDirs;

use crate::error::InterpreterError;
use crate::tape::{CellPolicy, TapeLayout};

/// Default cap on the number of Brainfuck cells.
pub const DEFAULT_MAX_TAPE_SIZE: usize = 32_768;

/// What `,` does once input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EofBehavior {
    /// Leave the current cell as it is.
    #[default]
    #[value(name = "unchanged")]
    NoChange,
    /// Set the current cell to 0.
    Zero,
}

/// Tunables of the Brainfuck dialect. Every field is independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainfuckConfig {
    pub bits: u8,
    pub signed: bool,
    /// Wrap cell values at their bounds instead of failing.
    pub cell_wrapping: bool,
    /// `None` means the tape may grow without bound.
    pub max_tape_size: Option<usize>,
    /// Pre-allocate `max_tape_size` cells and wrap the pointer around both ends.
    pub tape_wrapping: bool,
    pub eof: EofBehavior,
    /// Reconstruct multi-byte characters written one byte at a time.
    pub extended_output: bool,
}

impl Default for BrainfuckConfig {
    fn default() -> Self {
        Self {
            bits: 8,
            signed: false,
            cell_wrapping: true,
            max_tape_size: Some(DEFAULT_MAX_TAPE_SIZE),
            tape_wrapping: false,
            eof: EofBehavior::NoChange,
            extended_output: true,
        }
    }
}

impl BrainfuckConfig {
    pub fn with_bits(mut self, bits: u8) -> Self {
        self.bits = bits;
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn with_cell_wrapping(mut self, wrapping: bool) -> Self {
        self.cell_wrapping = wrapping;
        self
    }

    pub fn with_max_tape_size(mut self, max: Option<usize>) -> Self {
        self.max_tape_size = max;
        self
    }

    pub fn with_tape_wrapping(mut self, wrapping: bool) -> Self {
        self.tape_wrapping = wrapping;
        self
    }

    pub fn with_eof(mut self, eof: EofBehavior) -> Self {
        self.eof = eof;
        self
    }

    pub fn with_extended_output(mut self, enabled: bool) -> Self {
        self.extended_output = enabled;
        self
    }

    pub fn cell_policy(&self) -> Result<CellPolicy, InterpreterError> {
        CellPolicy::new(self.bits, self.signed, self.cell_wrapping)
    }

    /// Pointer wraparound needs a bounded tape; on an unbounded tape the
    /// wrapping flag has no effect.
    pub fn tape_layout(&self) -> TapeLayout {
        match (self.tape_wrapping, self.max_tape_size) {
            (true, Some(size)) => TapeLayout::Wrapping { size },
            (_, max_size) => TapeLayout::RightGrowable { max_size },
        }
    }

    /// Overlay the `[brainfuck]` section of a config file onto `self`.
    ///
    /// Unknown keys and unparsable values are skipped with a warning.
    pub fn merge_toml(mut self, content: &str) -> Self {
        let map = section(content, "brainfuck");

        macro_rules! set {
            ($field:ident, $key:literal, $parse:expr) => {
                if let Some(raw) = map.get($key) {
                    match $parse(raw.as_str()) {
                        Some(v) => self.$field = v,
                        None => tracing::warn!(key = $key, value = %raw, "ignoring invalid config value"),
                    }
                }
            };
        }

        set!(bits, "bits", parse_bits);
        set!(signed, "signed", parse_bool);
        set!(cell_wrapping, "cell_wrapping", parse_bool);
        set!(max_tape_size, "max_tape_size", parse_tape_size);
        set!(tape_wrapping, "tape_wrapping", parse_bool);
        set!(eof, "eof", parse_eof);
        set!(extended_output, "extended_output", parse_bool);

        for key in map.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(%key, "ignoring unknown config key");
            }
        }
        self
    }
}

const KNOWN_KEYS: &[&str] = &[
    "bits",
    "signed",
    "cell_wrapping",
    "max_tape_size",
    "tape_wrapping",
    "eof",
    "extended_output",
];

/// Path of the user config file, `$XDG_CONFIG_HOME/bfbool.toml`.
pub fn config_path() -> Option<PathBuf> {
    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bfbool.toml");
    Some(path)
}

/// Defaults overlaid with the user config file, if there is one.
pub fn load_user_config() -> BrainfuckConfig {
    let base = BrainfuckConfig::default();
    let Some(path) = config_path() else { return base };
    match fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "loaded user config");
            base.merge_toml(&content)
        }
        Err(_) => base,
    }
}

/// Very small hand-rolled parser: collect `key = value` pairs of one section.
/// Values may be quoted; `#` starts a comment line.
fn section(content: &str, name: &str) -> HashMap<String, String> {
    let mut in_section = false;
    let mut map = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = &line[1..line.len() - 1] == name;
            continue;
        }
        if !in_section { continue; }
        if let Some((key, raw)) = line.split_once('=') {
            let raw = raw.trim();
            let val = raw
                .strip_prefix('"')
                .and_then(|r| r.strip_suffix('"'))
                .unwrap_or(raw);
            map.insert(key.trim().to_string(), val.to_string());
        }
    }
    map
}

fn parse_bits(s: &str) -> Option<u8> {
    s.parse().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_tape_size(s: &str) -> Option<Option<usize>> {
    match s.to_ascii_lowercase().as_str() {
        "unbounded" | "none" | "inf" => Some(None),
        other => other.parse::<usize>().ok().map(Some),
    }
}

fn parse_eof(s: &str) -> Option<EofBehavior> {
    match s.to_ascii_lowercase().as_str() {
        "unchanged" | "no_change" => Some(EofBehavior::NoChange),
        "zero" => Some(EofBehavior::Zero),
        _ => None,
    }
}
