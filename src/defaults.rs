//! Built-in config keys and their defaults
//!
//! Every key perf understands out of the box, with its type and default
//! value. Keys found in config files that match a row here are coerced
//! through the row's type; everything else is carried as a raw string.

use crate::value::DefaultValue;
use crate::value::DefaultValue::{Bool, Double, Float, Int, Long, Str, U64};

/// One known config key
#[derive(Debug, Clone, Copy)]
pub struct ConfigDefault {
    pub section: &'static str,
    pub name: &'static str,
    pub value: DefaultValue,
}

const fn def(section: &'static str, name: &'static str, value: DefaultValue) -> ConfigDefault {
    ConfigDefault {
        section,
        name,
        value,
    }
}

/// All known keys, in the order `--list-all` reports them
pub const DEFAULT_CONFIGS: &[ConfigDefault] = &[
    def("colors", "top", Str("red, default")),
    def("colors", "medium", Str("green, default")),
    def("colors", "normal", Str("lightgray, default")),
    def("colors", "selected", Str("white, lightgray")),
    def("colors", "jump_arrows", Str("blue, default")),
    def("colors", "addr", Str("magenta, default")),
    def("colors", "root", Str("white, blue")),
    def("tui", "report", Bool(true)),
    def("tui", "annotate", Bool(true)),
    def("tui", "top", Bool(true)),
    def("buildid", "dir", Str("~/.debug")),
    def("annotate", "hide_src_code", Bool(false)),
    def("annotate", "use_offset", Bool(true)),
    def("annotate", "jump_arrows", Bool(true)),
    def("annotate", "show_nr_jumps", Bool(false)),
    def("annotate", "show_linenr", Bool(false)),
    def("annotate", "show_total_period", Bool(false)),
    def("gtk", "annotate", Bool(false)),
    def("gtk", "report", Bool(false)),
    def("gtk", "top", Bool(false)),
    def("pager", "cmd", Bool(true)),
    def("pager", "report", Bool(true)),
    def("pager", "annotate", Bool(true)),
    def("pager", "top", Bool(true)),
    def("pager", "diff", Bool(true)),
    def("help", "format", Str("man")),
    def("help", "autocorrect", Int(0)),
    def("hist", "percentage", Str("absolute")),
    def("ui", "show-headers", Bool(true)),
    def("call-graph", "record-mode", Str("fp")),
    def("call-graph", "dump-size", Long(8192)),
    def("call-graph", "print-type", Str("graph")),
    def("call-graph", "order", Str("callee")),
    def("call-graph", "sort-key", Str("function")),
    def("call-graph", "threshold", Double(0.5)),
    def("call-graph", "print-limit", Long(0)),
    def("report", "group", Bool(true)),
    def("report", "children", Bool(true)),
    def("report", "percent-limit", Float(0.0)),
    def("report", "queue-size", U64(0)),
    def("top", "children", Bool(true)),
    def("man", "viewer", Str("man")),
    def("kmem", "default", Str("slab")),
];

/// Look up the known-key row for `section.name`, if any
pub fn lookup(section: &str, name: &str) -> Option<&'static ConfigDefault> {
    DEFAULT_CONFIGS
        .iter()
        .find(|d| d.section == section && d.name == name)
}
