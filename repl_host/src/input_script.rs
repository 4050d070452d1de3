//! # Input Script Parser
//!
//! Provides a simple scripted keystroke format for deterministic sessions.
//!
//! ## Format
//!
//! Scripts are line-based, with each line representing one input action:
//! - Key names: `Enter`, `Backspace` (or `Del`), `Tab`, `Space`
//! - Single characters: `a`, `7`, `(`; shifted legends press Shift for you
//! - Modifiers: `Shift+a`, `Fn+x`, `Ctrl+c`, `Opt+o`, `Alt+z`
//! - Text strings: `"x = 5"` (expanded to individual key presses)
//! - Comments: `# This is a comment`
//! - Delays: `wait 100ms`, `wait 1s`
//!
//! ## Example
//!
//! ```text
//! # Bind a name and read it back
//! "x = 5"
//! Enter
//! wait 100ms
//! x
//! Enter
//! ```

use hal::{scancode_for_char, scancode_for_key, HalScancode};
use input_types::{LogicalKey, Modifiers};
use std::collections::VecDeque;
use thiserror::Error;

/// Input script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputScriptError {
    #[error("Invalid key name: {0}")]
    InvalidKeyName(String),

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,

    #[error("Invalid delay format: {0}")]
    InvalidDelay(String),
}

/// A single scripted input action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedInput {
    /// Tap a matrix key while holding modifiers
    Key(HalScancode, Modifiers),
    /// Wait for a duration (in milliseconds)
    Wait(u64),
}

impl ScriptedInput {
    /// The tap that types `c`, with Shift when the legend needs it
    pub fn for_char(c: char) -> Option<Self> {
        scancode_for_char(c).map(|(scancode, shift)| Self::key(scancode, shift))
    }

    /// The tap that produces a logical key
    pub fn for_key(key: LogicalKey) -> Option<Self> {
        scancode_for_key(key).map(|(scancode, shift)| Self::key(scancode, shift))
    }

    fn key(scancode: HalScancode, shift: bool) -> Self {
        let modifiers = if shift {
            Modifiers::SHIFT
        } else {
            Modifiers::none()
        };
        Self::Key(scancode, modifiers)
    }
}

/// Input script
///
/// Parses and provides scripted input for deterministic sessions.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    inputs: VecDeque<ScriptedInput>,
}

impl InputScript {
    /// Creates a new empty input script
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, InputScriptError> {
        let mut inputs = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();

            // A lone `#` is the key, not a comment
            if line.is_empty() || (line.starts_with('#') && line != "#") {
                continue;
            }

            inputs.extend(Self::parse_line(line, line_num + 1)?);
        }

        if inputs.is_empty() {
            return Err(InputScriptError::EmptyScript);
        }

        Ok(Self { inputs })
    }

    /// Parses a single line of script
    fn parse_line(line: &str, line_num: usize) -> Result<Vec<ScriptedInput>, InputScriptError> {
        let parse_error = |e: InputScriptError| InputScriptError::ParseError {
            line: line_num,
            message: e.to_string(),
        };

        if let Some(duration) = line.strip_prefix("wait ") {
            let millis = Self::parse_duration(duration).map_err(parse_error)?;
            return Ok(vec![ScriptedInput::Wait(millis)]);
        }

        if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
            let text = &line[1..line.len() - 1];
            return text
                .chars()
                .map(|c| {
                    ScriptedInput::for_char(c)
                        .ok_or_else(|| parse_error(InputScriptError::InvalidKeyName(c.to_string())))
                })
                .collect();
        }

        let (modifiers, key_name) = Self::parse_modifiers(line)?;
        let input = Self::parse_key(key_name).map_err(parse_error)?;

        Ok(vec![match input {
            ScriptedInput::Key(scancode, implied) => {
                ScriptedInput::Key(scancode, modifiers.with(implied))
            }
            wait => wait,
        }])
    }

    /// Parses modifiers from a key string (e.g., "Fn+x" → (Modifiers::FN, "x"))
    fn parse_modifiers(input: &str) -> Result<(Modifiers, &str), InputScriptError> {
        let mut modifiers = Modifiers::none();

        // `+` alone, or a trailing `++`, names the plus key
        let (prefix, key) = match input.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None => match input.rsplit_once('+') {
                Some((prefix, key)) if !prefix.is_empty() => (prefix, key),
                _ => return Ok((modifiers, input)),
            },
        };

        for modifier_str in prefix.split('+') {
            modifiers = match modifier_str.trim().to_lowercase().as_str() {
                "shift" => modifiers.with(Modifiers::SHIFT),
                "fn" => modifiers.with(Modifiers::FN),
                "ctrl" | "control" => modifiers.with(Modifiers::CTRL),
                "opt" | "option" => modifiers.with(Modifiers::OPT),
                "alt" => modifiers.with(Modifiers::ALT),
                other => return Err(InputScriptError::InvalidModifier(other.to_string())),
            };
        }

        Ok((modifiers, key.trim()))
    }

    /// Parses a key name
    fn parse_key(name: &str) -> Result<ScriptedInput, InputScriptError> {
        let key = match name.to_lowercase().as_str() {
            "enter" | "return" => LogicalKey::Enter,
            "backspace" | "back" | "del" | "delete" => LogicalKey::Backspace,
            "tab" => LogicalKey::Tab,
            "space" => LogicalKey::Space,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => LogicalKey::Char(c),
                    _ => return Err(InputScriptError::InvalidKeyName(name.to_string())),
                }
            }
        };

        ScriptedInput::for_key(key).ok_or_else(|| InputScriptError::InvalidKeyName(name.to_string()))
    }

    /// Parses a duration string (e.g., "100ms", "1s")
    fn parse_duration(s: &str) -> Result<u64, InputScriptError> {
        let s = s.trim().to_lowercase();

        if let Some(ms_str) = s.strip_suffix("ms") {
            ms_str
                .trim()
                .parse::<u64>()
                .map_err(|_| InputScriptError::InvalidDelay(s.to_string()))
        } else if let Some(s_str) = s.strip_suffix('s') {
            s_str
                .trim()
                .parse::<u64>()
                .map(|s| s.saturating_mul(1000))
                .map_err(|_| InputScriptError::InvalidDelay(s.to_string()))
        } else {
            Err(InputScriptError::InvalidDelay(s.to_string()))
        }
    }

    /// Returns the next input, if any
    pub fn next_input(&mut self) -> Option<ScriptedInput> {
        self.inputs.pop_front()
    }

    /// Returns true if the script has more inputs
    pub fn has_more(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Returns the number of remaining inputs
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(c: char) -> ScriptedInput {
        ScriptedInput::for_char(c).unwrap()
    }

    fn named(key: LogicalKey) -> ScriptedInput {
        ScriptedInput::for_key(key).unwrap()
    }

    #[test]
    fn test_parse_single_key() {
        let mut script = InputScript::from_text("a").unwrap();
        assert_eq!(script.remaining(), 1);
        let (scancode, _) = scancode_for_char('a').unwrap();
        assert_eq!(
            script.next_input().unwrap(),
            ScriptedInput::Key(scancode, Modifiers::none())
        );
    }

    #[test]
    fn test_shifted_character_implies_shift() {
        let mut script = InputScript::from_text("(").unwrap();
        let (scancode, shift) = scancode_for_char('(').unwrap();
        assert!(shift);
        assert_eq!(
            script.next_input().unwrap(),
            ScriptedInput::Key(scancode, Modifiers::SHIFT)
        );
    }

    #[test]
    fn test_parse_special_keys() {
        let mut script = InputScript::from_text("Enter\nDel\nBackspace\nTab\nSpace").unwrap();
        assert_eq!(script.remaining(), 5);
        assert_eq!(script.next_input().unwrap(), named(LogicalKey::Enter));
        assert_eq!(script.next_input().unwrap(), named(LogicalKey::Backspace));
        assert_eq!(script.next_input().unwrap(), named(LogicalKey::Backspace));
        assert_eq!(script.next_input().unwrap(), named(LogicalKey::Tab));
        assert_eq!(script.next_input().unwrap(), named(LogicalKey::Space));
    }

    #[test]
    fn test_parse_modifiers() {
        let mut script = InputScript::from_text("Ctrl+c\nFn+x\nShift+a\nOpt+Alt+z").unwrap();
        assert_eq!(script.remaining(), 4);

        let (c, _) = scancode_for_char('c').unwrap();
        let (x, _) = scancode_for_char('x').unwrap();
        let (a, _) = scancode_for_char('a').unwrap();
        let (z, _) = scancode_for_char('z').unwrap();
        assert_eq!(script.next_input().unwrap(), ScriptedInput::Key(c, Modifiers::CTRL));
        assert_eq!(script.next_input().unwrap(), ScriptedInput::Key(x, Modifiers::FN));
        assert_eq!(script.next_input().unwrap(), ScriptedInput::Key(a, Modifiers::SHIFT));
        assert_eq!(
            script.next_input().unwrap(),
            ScriptedInput::Key(z, Modifiers::OPT.with(Modifiers::ALT))
        );
    }

    #[test]
    fn test_plus_key() {
        let mut script = InputScript::from_text("+\nShift++").unwrap();
        assert_eq!(script.next_input().unwrap(), tap('+'));
        assert_eq!(script.next_input().unwrap(), tap('+'));
    }

    #[test]
    fn test_parse_quoted_string() {
        let mut script = InputScript::from_text(r#""x = 5""#).unwrap();
        assert_eq!(script.remaining(), 5);
        assert_eq!(script.next_input().unwrap(), tap('x'));
        assert_eq!(script.next_input().unwrap(), named(LogicalKey::Space));
    }

    #[test]
    fn test_quoted_string_with_unknown_character() {
        let result = InputScript::from_text("\"ä\"");
        assert!(matches!(result, Err(InputScriptError::ParseError { line: 1, .. })));
    }

    #[test]
    fn test_parse_wait() {
        let mut script = InputScript::from_text("wait 100ms\nwait 2s").unwrap();
        assert_eq!(script.next_input().unwrap(), ScriptedInput::Wait(100));
        assert_eq!(script.next_input().unwrap(), ScriptedInput::Wait(2000));
    }

    #[test]
    fn test_parse_comments() {
        let script = InputScript::from_text("# Comment\na\n# Another comment\nb").unwrap();
        assert_eq!(script.remaining(), 2);
    }

    #[test]
    fn test_hash_key_is_not_a_comment() {
        let mut script = InputScript::from_text("#").unwrap();
        assert_eq!(script.next_input().unwrap(), tap('#'));
    }

    #[test]
    fn test_parse_empty_lines() {
        let script = InputScript::from_text("a\n\nb\n\n\nc").unwrap();
        assert_eq!(script.remaining(), 3);
    }

    #[test]
    fn test_empty_script_error() {
        assert_eq!(
            InputScript::from_text("").unwrap_err(),
            InputScriptError::EmptyScript
        );
        assert_eq!(
            InputScript::from_text("# Just comments\n# Nothing else").unwrap_err(),
            InputScriptError::EmptyScript
        );
    }

    #[test]
    fn test_invalid_key_name() {
        let result = InputScript::from_text("a\nEscape");
        assert!(matches!(result, Err(InputScriptError::ParseError { line: 2, .. })));
    }

    #[test]
    fn test_invalid_modifier() {
        let result = InputScript::from_text("Hyper+a");
        assert!(matches!(result, Err(InputScriptError::InvalidModifier(_))));
    }

    #[test]
    fn test_invalid_delay() {
        let result = InputScript::from_text("wait abc");
        assert!(matches!(result, Err(InputScriptError::ParseError { .. })));
    }

    #[test]
    fn test_complex_script() {
        let script = InputScript::from_text(
            r#"
            # Bind and read back
            "x = 5"
            Enter
            wait 50ms
            x
            Enter
        "#,
        )
        .unwrap();

        // 5 chars + Enter + wait + x + Enter = 9
        assert_eq!(script.remaining(), 9);
    }
}
