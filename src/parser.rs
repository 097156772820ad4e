//! Config file parser
//!
//! Streams `section.name` / value pairs out of a perfconfig file through a
//! callback. The dialect: `[section]` and `[section "subsection"]` headers,
//! `key = value` lines, `#` and `;` comments, quoting and backslash escapes
//! in values, and backslash-newline continuation. Section and key names
//! fold to lowercase; subsection names keep their case.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::error::ConfigError;

/// Parse config text, invoking `f` with each flattened key and its value.
/// `None` means the key appeared without `=`. An error returned by `f`
/// aborts the parse and is passed through unchanged.
pub fn parse_str<F>(text: &str, origin: &str, f: F) -> Result<(), ConfigError>
where
    F: FnMut(&str, Option<&str>) -> Result<(), ConfigError>,
{
    Parser::new(text, origin).run(f)
}

/// Parse the config file at `path`. Errors name the file and the line the
/// offending entry started on.
pub fn parse_file<F>(path: &Path, f: F) -> Result<(), ConfigError>
where
    F: FnMut(&str, Option<&str>) -> Result<(), ConfigError>,
{
    let bytes = fs::read(path)?;
    let origin = path.display().to_string();
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            // Report the line holding the first invalid byte
            let prefix = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            let line = prefix.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
            return Err(ConfigError::syntax(origin, line));
        }
    };
    parse_str(&text, &origin, f)
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    origin: &'a str,
    line: u32,
    eof: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, origin: &'a str) -> Self {
        Parser {
            chars: text.chars().peekable(),
            origin,
            line: 1,
            eof: false,
        }
    }

    /// Next character with CRLF folded to `\n`. At end of input a `\n` is
    /// synthesized, `eof` is set, and the line counter stays put.
    fn next_char(&mut self) -> char {
        if self.eof {
            return '\n';
        }
        match self.chars.next() {
            None => {
                self.eof = true;
                '\n'
            }
            Some('\r') => {
                if self.chars.peek() == Some(&'\n') {
                    self.chars.next();
                    self.line += 1;
                    '\n'
                } else {
                    '\r'
                }
            }
            Some('\n') => {
                self.line += 1;
                '\n'
            }
            Some(c) => c,
        }
    }

    fn syntax_at(&self, line: u32) -> ConfigError {
        ConfigError::syntax(self.origin, line)
    }

    fn run<F>(&mut self, mut f: F) -> Result<(), ConfigError>
    where
        F: FnMut(&str, Option<&str>) -> Result<(), ConfigError>,
    {
        let mut comment = false;
        let mut first = true;
        // Current section prefix including its trailing dot
        let mut base = String::new();

        loop {
            let c = self.next_char();
            if first {
                first = false;
                if c == '\u{feff}' {
                    continue;
                }
            }
            if c == '\n' {
                if self.eof {
                    return Ok(());
                }
                comment = false;
                continue;
            }
            if comment || is_space(c) {
                continue;
            }
            if c == '#' || c == ';' {
                comment = true;
                continue;
            }
            if c == '[' {
                let line = self.line;
                match self.section_name() {
                    Some(name) if !name.is_empty() => {
                        base = name;
                        base.push('.');
                    }
                    _ => return Err(self.syntax_at(line)),
                }
                continue;
            }
            if !c.is_ascii_alphabetic() || base.is_empty() {
                return Err(self.syntax_at(self.line));
            }

            // The value may run past the line the key starts on, so keep
            // that line for error reporting
            let line = self.line;
            let mut key = base.clone();
            key.push(c.to_ascii_lowercase());
            match self.key_and_value(&mut key) {
                Some(value) => f(&key, value.as_deref())?,
                None => return Err(self.syntax_at(line)),
            }
        }
    }

    /// Rest of a `[...]` header after the opening bracket. Returns the
    /// flattened name, or None on malformed input. An empty name means
    /// `[]`, which the caller rejects.
    fn section_name(&mut self) -> Option<String> {
        let mut name = String::new();
        loop {
            let c = self.next_char();
            if self.eof {
                return None;
            }
            if c == ']' {
                return Some(name);
            }
            if is_space(c) {
                return self.subsection_name(name, c);
            }
            if !is_key_char(c) && c != '.' {
                return None;
            }
            name.push(c.to_ascii_lowercase());
        }
    }

    /// `"subsection"]` part of an extended header. The quoted name joins
    /// the section with a dot and keeps its case; `\` escapes the next
    /// character verbatim.
    fn subsection_name(&mut self, mut name: String, mut c: char) -> Option<String> {
        loop {
            if c == '\n' {
                return None;
            }
            c = self.next_char();
            if !is_space(c) {
                break;
            }
        }
        if c != '"' {
            return None;
        }
        name.push('.');
        loop {
            let mut ch = self.next_char();
            if ch == '\n' {
                return None;
            }
            if ch == '"' {
                break;
            }
            if ch == '\\' {
                ch = self.next_char();
                if ch == '\n' {
                    return None;
                }
            }
            name.push(ch);
        }
        if self.next_char() != ']' {
            return None;
        }
        Some(name)
    }

    /// Rest of a key after its first character, then the value if one
    /// follows `=`. `Some(None)` is a key with no `=`; None is a syntax
    /// error.
    fn key_and_value(&mut self, key: &mut String) -> Option<Option<String>> {
        let mut c;
        loop {
            c = self.next_char();
            if self.eof || !is_key_char(c) {
                break;
            }
            key.push(c.to_ascii_lowercase());
        }
        while c == ' ' || c == '\t' {
            c = self.next_char();
        }
        if c == '\n' {
            return Some(None);
        }
        if c != '=' {
            return None;
        }
        self.parse_value().map(Some)
    }

    /// Value text after `=`. Runs of whitespace outside quotes collapse
    /// to a single space, leading and trailing whitespace drops, `#`/`;`
    /// start a comment outside quotes, and backslash-newline continues
    /// onto the next line.
    fn parse_value(&mut self) -> Option<String> {
        let mut value = String::new();
        let mut quote = false;
        let mut comment = false;
        let mut space = false;

        loop {
            let c = self.next_char();
            if c == '\n' {
                if quote {
                    return None;
                }
                return Some(value);
            }
            if comment {
                continue;
            }
            if is_space(c) && !quote {
                space = true;
                continue;
            }
            if !quote && (c == ';' || c == '#') {
                comment = true;
                continue;
            }
            if space {
                if !value.is_empty() {
                    value.push(' ');
                }
                space = false;
            }
            if c == '\\' {
                let c = self.next_char();
                match c {
                    '\n' => continue,
                    't' => value.push('\t'),
                    'b' => value.push('\x08'),
                    'n' => value.push('\n'),
                    '\\' | '"' => value.push(c),
                    _ => return None,
                }
                continue;
            }
            if c == '"' {
                quote = !quote;
                continue;
            }
            value.push(c);
        }
    }
}

pub(crate) fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
