//! Settings file parser
//!
//! The format is one `KEY=value` pair per line:
//!
//! ```text
//! # comment
//! FRAME_SKIP=2
//! USE_TIMER_PACING=True
//! RAW_FRAMES_DIR="frames_delta/mario"
//! ```
//!
//! Values are `True`/`False`, a double-quoted string, or a decimal integer.
//! Blank lines, comments, lines without `=`, unknown keys and values of the
//! wrong type are skipped; a recognized key only overwrites its own field.

use heapless::String;
use kinema_hal::FileStore;

use super::types::{Settings, MAX_GPIO, SETTINGS_FILE};
use crate::library::{join, MAX_PATH_LEN};

/// A typed settings value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Bool(bool),
    Str(&'a str),
    Int(i64),
}

/// Why a setting was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingError {
    /// Key is not a known setting
    UnknownKey,
    /// Value type does not match the setting
    TypeMismatch,
    /// Integer outside the setting's range
    OutOfRange,
    /// String longer than the setting can hold
    TooLong,
}

/// Why a line could not be read as a setting at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// No `=` separator
    MissingSeparator,
    /// Empty key
    EmptyKey,
    /// Value is not a bool, quoted string, or integer
    InvalidValue,
}

/// Parse one line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<(&str, Value<'_>)>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (key, raw) = line.split_once('=').ok_or(LineError::MissingSeparator)?;
    let key = key.trim();
    let raw = raw.trim();
    if key.is_empty() {
        return Err(LineError::EmptyKey);
    }

    let value = match raw {
        "True" => Value::Bool(true),
        "False" => Value::Bool(false),
        _ if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') => {
            Value::Str(&raw[1..raw.len() - 1])
        }
        _ => Value::Int(raw.parse().map_err(|_| LineError::InvalidValue)?),
    };
    Ok(Some((key, value)))
}

fn as_bool(value: Value<'_>) -> Result<bool, SettingError> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(SettingError::TypeMismatch),
    }
}

fn as_int<T: TryFrom<i64>>(value: Value<'_>) -> Result<T, SettingError> {
    match value {
        Value::Int(n) => T::try_from(n).map_err(|_| SettingError::OutOfRange),
        _ => Err(SettingError::TypeMismatch),
    }
}

fn as_path(value: Value<'_>) -> Result<String<MAX_PATH_LEN>, SettingError> {
    match value {
        Value::Str(s) => {
            let mut path = String::new();
            path.push_str(s).map_err(|_| SettingError::TooLong)?;
            Ok(path)
        }
        _ => Err(SettingError::TypeMismatch),
    }
}

impl Settings {
    /// Set one field by its settings-file key
    ///
    /// The field is left untouched on error.
    pub fn set(&mut self, key: &str, value: Value<'_>) -> Result<(), SettingError> {
        match key {
            "FRAME_SKIP" => {
                let skip: u16 = as_int(value)?;
                if skip == 0 {
                    return Err(SettingError::OutOfRange);
                }
                self.frame_skip = skip;
            }
            "PRINT_FRAMES" => self.print_frames = as_bool(value)?,
            "RAW_FRAMES_DIR" => self.raw_frames_dir = as_path(value)?,
            "USE_RAW_FRAMES" => self.use_raw_frames = as_bool(value)?,
            "FRAME_W" => self.frame_width = nonzero(as_int(value)?)?,
            "FRAME_H" => self.frame_height = nonzero(as_int(value)?)?,
            "TARGET_LOOP_MS" => self.target_loop_ms = as_int(value)?,
            "USE_TIMER_PACING" => self.use_timer_pacing = as_bool(value)?,
            "FOLDERS_ROOT" => self.folders_root = as_path(value)?,
            "BUTTON_A_PIN" => self.button_a_pin = gpio(as_int(value)?)?,
            "BUTTON_B_PIN" => self.button_b_pin = gpio(as_int(value)?)?,
            "DEBOUNCE_MS" => self.debounce_ms = as_int(value)?,
            _ => return Err(SettingError::UnknownKey),
        }
        Ok(())
    }

    /// Apply every valid line of a settings file
    ///
    /// Returns the number of settings applied.
    pub fn apply(&mut self, text: &str) -> usize {
        text.lines()
            .filter_map(|line| parse_line(line).ok().flatten())
            .filter(|&(key, value)| self.set(key, value).is_ok())
            .count()
    }
}

fn nonzero(n: u16) -> Result<u16, SettingError> {
    if n == 0 {
        Err(SettingError::OutOfRange)
    } else {
        Ok(n)
    }
}

fn gpio(pin: u8) -> Result<u8, SettingError> {
    if pin > MAX_GPIO {
        Err(SettingError::OutOfRange)
    } else {
        Ok(pin)
    }
}

/// Apply `dir/settings.txt` from `store` over `settings`
///
/// Returns false if the file is missing or not valid UTF-8, in which case
/// `settings` is unchanged.
pub fn load_settings<S: FileStore>(store: &S, dir: &str, settings: &mut Settings) -> bool {
    let Ok(path) = join(dir, SETTINGS_FILE) else {
        return false;
    };
    let Ok(bytes) = store.read(&path) else {
        return false;
    };
    let Ok(text) = core::str::from_utf8(bytes) else {
        return false;
    };
    settings.apply(text);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::StaticStore;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_line("A=True"), Ok(Some(("A", Value::Bool(true)))));
        assert_eq!(parse_line(" B = False "), Ok(Some(("B", Value::Bool(false)))));
        assert_eq!(parse_line("C=\"x/y\""), Ok(Some(("C", Value::Str("x/y")))));
        assert_eq!(parse_line("D=-12"), Ok(Some(("D", Value::Int(-12)))));
        assert_eq!(parse_line("E=\"\""), Ok(Some(("E", Value::Str("")))));
    }

    #[test]
    fn test_parse_skipped_lines() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# FRAME_SKIP=1"), Ok(None));
        assert_eq!(parse_line("FRAME_SKIP"), Err(LineError::MissingSeparator));
        assert_eq!(parse_line("=3"), Err(LineError::EmptyKey));
        assert_eq!(parse_line("FRAME_SKIP=two"), Err(LineError::InvalidValue));
        // Lowercase booleans are not booleans
        assert_eq!(parse_line("X=true"), Err(LineError::InvalidValue));
    }

    #[test]
    fn test_value_keeps_equals_sign() {
        assert_eq!(parse_line("K=\"a=b\""), Ok(Some(("K", Value::Str("a=b")))));
    }

    #[test]
    fn test_apply_overwrites_only_known_keys() {
        let mut s = Settings::default();
        let applied = s.apply(
            "# demo\n\
             FRAME_SKIP=2\n\
             TARGET_LOOP_MS=900\n\
             RAW_FRAMES_DIR=\"frames_delta/mario\"\n\
             USE_TIMER_PACING=False\n\
             NOT_A_KEY=5\n\
             garbage line\n",
        );
        assert_eq!(applied, 4);
        assert_eq!(s.frame_skip, 2);
        assert_eq!(s.target_loop_ms, 900);
        assert_eq!(s.raw_frames_dir.as_str(), "frames_delta/mario");
        assert!(!s.use_timer_pacing);
        assert_eq!(s.debounce_ms, 200);
    }

    #[test]
    fn test_type_mismatch_ignored() {
        let mut s = Settings::default();
        assert_eq!(s.set("FRAME_SKIP", Value::Bool(true)), Err(SettingError::TypeMismatch));
        assert_eq!(s.set("PRINT_FRAMES", Value::Int(1)), Err(SettingError::TypeMismatch));
        assert_eq!(s.set("FOLDERS_ROOT", Value::Int(1)), Err(SettingError::TypeMismatch));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut s = Settings::default();
        assert_eq!(s.set("FRAME_SKIP", Value::Int(0)), Err(SettingError::OutOfRange));
        assert_eq!(s.set("FRAME_W", Value::Int(0)), Err(SettingError::OutOfRange));
        assert_eq!(s.set("TARGET_LOOP_MS", Value::Int(-5)), Err(SettingError::OutOfRange));
        assert_eq!(s.set("BUTTON_A_PIN", Value::Int(30)), Err(SettingError::OutOfRange));
        assert_eq!(s.set("FRAME_H", Value::Int(70_000)), Err(SettingError::OutOfRange));
        assert_eq!(s, Settings::default());

        assert_eq!(s.set("BUTTON_A_PIN", Value::Int(29)), Ok(()));
        assert_eq!(s.button_a_pin, 29);
    }

    #[test]
    fn test_long_path_rejected() {
        let mut s = Settings::default();
        let long = "x".repeat(MAX_PATH_LEN + 1);
        assert_eq!(s.set("RAW_FRAMES_DIR", Value::Str(&long)), Err(SettingError::TooLong));
        assert_eq!(s.raw_frames_dir.as_str(), "frames_delta/sega");
    }

    #[test]
    fn test_load_from_store() {
        const FILES: &[(&str, &[u8])] = &[
            ("frames_delta/bad/settings.txt", &[0xFF, 0xFE]),
            ("frames_delta/sega/settings.txt", b"FRAME_SKIP=1\nDEBOUNCE_MS=50\n"),
        ];
        let store = StaticStore::new(FILES);

        let mut s = Settings::default();
        assert!(load_settings(&store, "frames_delta/sega", &mut s));
        assert_eq!(s.frame_skip, 1);
        assert_eq!(s.debounce_ms, 50);

        let mut s = Settings::default();
        assert!(!load_settings(&store, "frames_delta/missing", &mut s));
        assert!(!load_settings(&store, "frames_delta/bad", &mut s));
        assert_eq!(s, Settings::default());
    }
}
