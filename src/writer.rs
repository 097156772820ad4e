//! Config file writer
//!
//! Renders a [`ConfigSet`] back into the file format the parser accepts
//! and replaces the target file atomically. Values are quoted and escaped
//! only when reloading them verbatim would change them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::ConfigError;
use crate::store::{ConfigSet, ConfigSection};

/// Render `set` in config file format. Dot-free keys go under a plain
/// `[section]` header; keys carrying a subsection render under
/// `[section "subsection"]`, one header per subsection in first
/// appearance order.
pub fn render(set: &ConfigSet) -> String {
    let mut out = String::new();
    for section in set.sections() {
        render_section(&mut out, section);
    }
    out
}

/// Write `set` to `path`, whole file at once. The content lands in a
/// temporary file first and moves into place with a rename.
pub fn write_file(set: &ConfigSet, path: &Path) -> Result<(), ConfigError> {
    let rendered = render(set);

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let temp_name = format!(
        ".tmp.{}.{}",
        std::process::id(),
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    );
    let temp_path = dir.join(temp_name);

    fs::write(&temp_path, rendered.as_bytes())?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

fn render_section(out: &mut String, section: &ConfigSection) {
    let plain: Vec<_> = section
        .items
        .iter()
        .filter(|i| !i.name.contains('.'))
        .collect();
    if !plain.is_empty() {
        out.push('[');
        out.push_str(&section.name);
        out.push_str("]\n");
        for item in plain {
            render_item(out, &item.name, &item.value);
        }
    }

    let mut subsections: Vec<&str> = Vec::new();
    for item in &section.items {
        if let Some((subsection, _)) = item.name.rsplit_once('.') {
            if !subsections.contains(&subsection) {
                subsections.push(subsection);
            }
        }
    }
    for subsection in subsections {
        out.push('[');
        out.push_str(&section.name);
        out.push_str(" \"");
        out.push_str(&escape_subsection(subsection));
        out.push_str("\"]\n");
        for item in &section.items {
            if let Some((sub, name)) = item.name.rsplit_once('.') {
                if sub == subsection {
                    render_item(out, name, &item.value);
                }
            }
        }
    }
}

fn render_item(out: &mut String, name: &str, value: &str) {
    out.push('\t');
    out.push_str(name);
    if value.is_empty() {
        out.push_str(" =\n");
        return;
    }
    out.push_str(" = ");
    if needs_quote(value) {
        out.push('"');
        out.push_str(&escape_value(value));
        out.push('"');
    } else {
        out.push_str(&escape_value(value));
    }
    out.push('\n');
}

/// Whether reading the value back unquoted would change it. Leading and
/// trailing spaces would be trimmed, space runs would collapse, comment
/// characters would truncate, and the whitespace characters without an
/// escape form survive only inside quotes.
fn needs_quote(value: &str) -> bool {
    value.starts_with(' ')
        || value.ends_with(' ')
        || value.contains("  ")
        || value.contains('#')
        || value.contains(';')
        || value.chars().any(|c| matches!(c, '\r' | '\x0b' | '\x0c'))
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

fn escape_subsection(subsection: &str) -> String {
    let mut out = String::with_capacity(subsection.len());
    for c in subsection.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_from(text: &str) -> ConfigSet {
        let mut set = ConfigSet::new();
        set.read_str(text, "test").unwrap();
        set
    }

    fn reload(rendered: &str) -> ConfigSet {
        let mut set = ConfigSet::new();
        set.read_str(rendered, "rendered").unwrap();
        set
    }

    #[test]
    fn test_render_plain_sections() {
        let mut set = ConfigSet::new();
        set.set_value("colors", "top", "blue, default").unwrap();
        set.set_value("colors", "medium", "green, default").unwrap();
        set.set_value("tui", "report", "off").unwrap();

        assert_eq!(
            render(&set),
            "[colors]\n\ttop = blue, default\n\tmedium = green, default\n[tui]\n\treport = false\n"
        );
    }

    #[test]
    fn test_render_empty_value() {
        let mut set = ConfigSet::new();
        set.set_value("my", "key", "").unwrap();
        assert_eq!(render(&set), "[my]\n\tkey =\n");
    }

    #[test]
    fn test_render_subsections() {
        let set = set_from(
            "[alias]\nplain = 1\n[alias \"One\"]\na = 1\n[alias \"Two\"]\nb = 2\n[alias \"One\"]\nc = 3\n",
        );
        assert_eq!(
            render(&set),
            "[alias]\n\tplain = 1\n[alias \"One\"]\n\ta = 1\n\tc = 3\n[alias \"Two\"]\n\tb = 2\n"
        );
    }

    #[test]
    fn test_render_subsection_only_section_has_no_bare_header() {
        let set = set_from("[alias \"sub\"]\nkey = 1\n");
        assert_eq!(render(&set), "[alias \"sub\"]\n\tkey = 1\n");
    }

    #[test]
    fn test_quoting_when_needed() {
        let mut set = ConfigSet::new();
        set.set_value("s", "lead", " padded").unwrap();
        set.set_value("s", "runs", "a  b").unwrap();
        set.set_value("s", "hash", "a#b").unwrap();
        set.set_value("s", "semi", "a;b").unwrap();
        set.set_value("s", "single", "a b").unwrap();

        assert_eq!(
            render(&set),
            "[s]\n\tlead = \" padded\"\n\truns = \"a  b\"\n\thash = \"a#b\"\n\tsemi = \"a;b\"\n\tsingle = a b\n"
        );
    }

    #[test]
    fn test_escapes() {
        let mut set = ConfigSet::new();
        set.set_value("s", "k", "tab\there \"and\" back\\slash").unwrap();
        assert_eq!(
            render(&set),
            "[s]\n\tk = tab\\there \\\"and\\\" back\\\\slash\n"
        );
    }

    #[test]
    fn test_round_trip_plain() {
        let mut set = ConfigSet::new();
        set.set_value("s", "lead", "  two  spaces  ").unwrap();
        set.set_value("s", "ctrl", "a\tb\nc").unwrap();
        set.set_value("s", "comment", "v # not a comment").unwrap();
        set.set_value("colors", "top", "red, default").unwrap();

        let back = reload(&render(&set));
        assert_eq!(back.get("s", "lead"), Some("  two  spaces  "));
        assert_eq!(back.get("s", "ctrl"), Some("a\tb\nc"));
        assert_eq!(back.get("s", "comment"), Some("v # not a comment"));
        assert_eq!(back.get("colors", "top"), Some("red, default"));
    }

    #[test]
    fn test_round_trip_subsection_with_escapes() {
        let set = set_from("[alias \"qu\\\"ote.Back\\\\slash\"]\nk = 1\n");
        let name = "qu\"ote.Back\\slash.k";
        assert_eq!(set.get("alias", name), Some("1"));

        let back = reload(&render(&set));
        assert_eq!(back.get("alias", name), Some("1"));
    }

    #[test]
    fn test_round_trip_carriage_return() {
        let mut set = ConfigSet::new();
        set.set_value("s", "k", "a\rb").unwrap();
        let back = reload(&render(&set));
        assert_eq!(back.get("s", "k"), Some("a\rb"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfconfig");

        let mut set = ConfigSet::new();
        set.set_value("colors", "top", "blue").unwrap();
        write_file(&set, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[colors]\n\ttop = blue\n");

        // No temporary file left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "perfconfig")
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfconfig");
        fs::write(&path, "[old]\nstale = 1\n").unwrap();

        let mut set = ConfigSet::new();
        set.set_value("new", "fresh", "2").unwrap();
        write_file(&set, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[new]\n\tfresh = 2\n");
    }
}
