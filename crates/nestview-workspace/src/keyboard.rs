//! Editing model behind the keyboard-button inspector panel.
//!
//! A button carries a primary character and an optional shift character.
//! Characters are typed as text, so entries may use escape sequences
//! (`\n`, `\t`, `\\`, `\u00e9`, ...). Half-typed or malformed entries are
//! dropped and the button keeps what it had.

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Error, PartialEq)]
pub enum KeyInputError {
    #[error("entry ends inside an escape sequence")]
    IncompleteEscape,
    #[error("unrecognized escape sequence `\\{0}`")]
    UnknownEscape(char),
    #[error("`{0}` is not a valid character code")]
    InvalidCode(String),
    #[error("`{0}` is more than one character")]
    Cluster(String),
}

pub const GLYPH_MISSING_WARNING: &str = "Character not defined in font, consider using an icon";

/// Inspector-facing state of one keyboard button.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyboardButton {
    pub character: Option<char>,
    pub use_shift_character: bool,
    pub shift_character: Option<char>,
    pub match_button_text_to_character: bool,
    /// Label of the button's text component; `None` when it has none.
    pub button_text: Option<String>,
    pub object_name: String,
}

impl KeyboardButton {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            ..Self::default()
        }
    }

    pub fn with_text_component(mut self) -> Self {
        self.button_text = Some(String::new());
        self
    }

    /// Apply a primary-character entry. Returns false when the entry was
    /// ignored.
    pub fn enter_character(&mut self, input: &str) -> bool {
        match parse_key_input(input) {
            Ok(ch) => {
                self.character = ch;
                self.sync_text_and_name(ch);
                true
            }
            Err(e) => {
                log::debug!("ignoring character entry {input:?}: {e}");
                false
            }
        }
    }

    pub fn enter_shift_character(&mut self, input: &str) -> bool {
        match parse_key_input(input) {
            Ok(ch) => {
                self.shift_character = ch;
                self.sync_text_and_name(ch);
                true
            }
            Err(e) => {
                log::debug!("ignoring shift character entry {input:?}: {e}");
                false
            }
        }
    }

    pub fn set_match_button_text(&mut self, on: bool) {
        if self.match_button_text_to_character == on {
            return;
        }
        self.match_button_text_to_character = on;
        self.sync_text_and_name(self.character);
    }

    /// The "shift character is uppercase" affordance only exists for `a..=z`.
    pub fn offers_uppercase_shift(&self) -> bool {
        self.use_shift_character && self.character.is_some_and(|c| c.is_ascii_lowercase())
    }

    pub fn shift_is_uppercase(&self) -> bool {
        self.offers_uppercase_shift()
            && self.character.map(|c| c.to_ascii_uppercase()) == self.shift_character
    }

    pub fn set_shift_is_uppercase(&mut self, on: bool) {
        if !self.offers_uppercase_shift() {
            return;
        }
        self.shift_character = if on {
            self.character.map(|c| c.to_ascii_uppercase())
        } else {
            None
        };
    }

    /// Whether the inspector shows a free shift-character field.
    pub fn shows_shift_field(&self) -> bool {
        self.use_shift_character && !self.shift_is_uppercase()
    }

    /// Warning to show when the matched label cannot be drawn by the font.
    pub fn glyph_warning(&self, has_glyph: impl Fn(char) -> bool) -> Option<&'static str> {
        if self.button_text.is_none() || !self.match_button_text_to_character {
            return None;
        }
        match self.character {
            Some(c) if !has_glyph(c) => Some(GLYPH_MISSING_WARNING),
            _ => None,
        }
    }

    fn sync_text_and_name(&mut self, ch: Option<char>) {
        let raw = ch.map(String::from).unwrap_or_default();
        if self.match_button_text_to_character {
            if let Some(text) = &mut self.button_text {
                *text = raw.clone();
            }
        }
        self.object_name = match ch.and_then(key_code_name) {
            Some(name) => name.to_string(),
            None => raw,
        };
    }
}

/// Decode one key character from typed text. An empty entry means "none".
pub fn parse_key_input(input: &str) -> Result<Option<char>, KeyInputError> {
    if input.is_empty() {
        return Ok(None);
    }
    let text = unescape(input)?;
    let Some(first) = text.graphemes(true).next() else {
        return Ok(None);
    };
    let mut chars = first.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Some(c)),
        _ => Err(KeyInputError::Cluster(first.to_string())),
    }
}

fn unescape(input: &str) -> Result<String, KeyInputError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or(KeyInputError::IncompleteEscape)?;
        let decoded = match esc {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'e' => '\u{1B}',
            '0' => '\0',
            '\\' | '"' | '\'' | ' ' | '.' | '*' | '+' | '?' | '|' | '(' | ')' | '[' | ']'
            | '{' | '}' | '^' | '$' | '#' => esc,
            'u' => hex_char(&mut chars, 4)?,
            'x' => hex_char(&mut chars, 2)?,
            other => return Err(KeyInputError::UnknownEscape(other)),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<char, KeyInputError> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() < digits {
        return Err(KeyInputError::IncompleteEscape);
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(KeyInputError::InvalidCode(hex))
}

/// Key-code name for characters that have one.
pub fn key_code_name(c: char) -> Option<&'static str> {
    const LETTERS: [&str; 26] = [
        "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
        "S", "T", "U", "V", "W", "X", "Y", "Z",
    ];
    const DIGITS: [&str; 10] = [
        "Alpha0", "Alpha1", "Alpha2", "Alpha3", "Alpha4", "Alpha5", "Alpha6", "Alpha7", "Alpha8",
        "Alpha9",
    ];
    let name = match c {
        'a'..='z' => LETTERS[(c as u8 - b'a') as usize],
        '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
        '\u{08}' => "Backspace",
        '\t' => "Tab",
        '\r' => "Return",
        '\u{1B}' => "Escape",
        ' ' => "Space",
        '!' => "Exclaim",
        '"' => "DoubleQuote",
        '#' => "Hash",
        '$' => "Dollar",
        '%' => "Percent",
        '&' => "Ampersand",
        '\'' => "Quote",
        '(' => "LeftParen",
        ')' => "RightParen",
        '*' => "Asterisk",
        '+' => "Plus",
        ',' => "Comma",
        '-' => "Minus",
        '.' => "Period",
        '/' => "Slash",
        ':' => "Colon",
        ';' => "Semicolon",
        '<' => "Less",
        '=' => "Equals",
        '>' => "Greater",
        '?' => "Question",
        '@' => "At",
        '[' => "LeftBracket",
        '\\' => "Backslash",
        ']' => "RightBracket",
        '^' => "Caret",
        '_' => "Underscore",
        '`' => "BackQuote",
        '{' => "LeftCurlyBracket",
        '|' => "Pipe",
        '}' => "RightCurlyBracket",
        '~' => "Tilde",
        '\u{7F}' => "Delete",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_escaped() {
        assert_eq!(parse_key_input("q"), Ok(Some('q')));
        assert_eq!(parse_key_input("qwerty"), Ok(Some('q')));
        assert_eq!(parse_key_input(r"\t"), Ok(Some('\t')));
        assert_eq!(parse_key_input(r"\u00e9"), Ok(Some('é')));
        assert_eq!(parse_key_input(""), Ok(None));
    }

    #[test]
    fn test_parse_rejects_half_typed_escapes() {
        assert_eq!(parse_key_input("\\"), Err(KeyInputError::IncompleteEscape));
        assert_eq!(parse_key_input(r"\u00"), Err(KeyInputError::IncompleteEscape));
        assert_eq!(parse_key_input(r"\q"), Err(KeyInputError::UnknownEscape('q')));
        assert_eq!(
            parse_key_input(r"\uD800"),
            Err(KeyInputError::InvalidCode("D800".into()))
        );
    }

    #[test]
    fn test_parse_rejects_multi_scalar_cluster() {
        assert!(matches!(
            parse_key_input("e\u{301}"),
            Err(KeyInputError::Cluster(_))
        ));
    }

    #[test]
    fn test_malformed_entry_keeps_previous_character() {
        let mut b = KeyboardButton::new("key").with_text_component();
        b.set_match_button_text(true);
        assert!(b.enter_character("a"));
        assert!(!b.enter_character(r"\u00"));
        assert_eq!(b.character, Some('a'));
        assert_eq!(b.button_text.as_deref(), Some("a"));
        assert_eq!(b.object_name, "A");
    }

    #[test]
    fn test_object_name_uses_key_code_names() {
        let mut b = KeyboardButton::new("key");
        b.enter_character(" ");
        assert_eq!(b.object_name, "Space");
        b.enter_character("7");
        assert_eq!(b.object_name, "Alpha7");
        b.enter_character("Q");
        assert_eq!(b.object_name, "Q");
        b.enter_character("é");
        assert_eq!(b.object_name, "é");
    }

    #[test]
    fn test_uppercase_shift_toggle() {
        let mut b = KeyboardButton::new("key");
        b.enter_character("g");
        b.use_shift_character = true;
        assert!(b.offers_uppercase_shift());
        assert!(!b.shift_is_uppercase());

        b.set_shift_is_uppercase(true);
        assert_eq!(b.shift_character, Some('G'));
        assert!(b.shift_is_uppercase());
        assert!(!b.shows_shift_field());

        b.set_shift_is_uppercase(false);
        assert_eq!(b.shift_character, None);
        assert!(b.shows_shift_field());
    }

    #[test]
    fn test_uppercase_shift_not_offered_for_symbols() {
        let mut b = KeyboardButton::new("key");
        b.enter_character("!");
        b.use_shift_character = true;
        b.set_shift_is_uppercase(true);
        assert_eq!(b.shift_character, None);
        assert!(b.shows_shift_field());
    }

    #[test]
    fn test_glyph_warning() {
        let mut b = KeyboardButton::new("key").with_text_component();
        b.set_match_button_text(true);
        b.enter_character(r"\u2603");
        assert_eq!(b.glyph_warning(|c| c.is_ascii()), Some(GLYPH_MISSING_WARNING));
        assert_eq!(b.glyph_warning(|_| true), None);
    }
}
