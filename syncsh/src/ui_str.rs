// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

pub const EXIT_CONFIRMATION_PROMPT: &str = "Do you wish to exit? (y/n): ";
pub const EXIT_DECLINED_MSG: &str = "No operations performed";
pub const UNRECOGNIZED_COMMAND_MSG: &str = "unrecognized command";
pub const NOT_INTERACTIVE_MSG: &str =
    "syncsh needs an interactive terminal, stdin and stdout can't be redirected";

/// One row per command. Rows are joined with `\r\n` when printed.
pub const HELP_ROWS: &[&str] = &[
    "Commands:",
    "  help, ?          show this help",
    "  ls [name...]     list files with modification time and size",
    "  stat name...     show size and modification time of files",
    "  history          list the lines entered so far",
    "  exit             leave syncsh",
    "",
    "Keys: tab completes commands and file names, up/down browse history,",
    "ctrl+a/ctrl+e jump to start/end of line, ctrl+c quits immediately.",
];

#[must_use]
pub fn no_such_file_msg(name: &str) -> String { format!("{name}: no such file") }

#[must_use]
pub fn stat_usage_msg() -> String { "usage: stat name...".to_string() }
