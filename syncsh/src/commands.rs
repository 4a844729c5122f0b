// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use chrono::{DateTime, Local};
use std::{io, path::Path, str::FromStr};
use strum_macros::EnumString;

/// First word of a line. `?` is the same as `help`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CommandName {
    #[strum(serialize = "help", serialize = "?")]
    Help,
    Ls,
    Stat,
    Exit,
}

/// A submitted line, split into the command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Ls(Vec<String>),
    Stat(Vec<String>),
    Exit,
    Unrecognized(String),
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Command::Empty;
        };
        let arguments = words.map(str::to_owned).collect();

        match CommandName::from_str(first) {
            Ok(CommandName::Help) => Command::Help,
            Ok(CommandName::Ls) => Command::Ls(arguments),
            Ok(CommandName::Stat) => Command::Stat(arguments),
            Ok(CommandName::Exit) => Command::Exit,
            Err(_) => Command::Unrecognized(first.to_owned()),
        }
    }
}

/// What `ls` and `stat` show for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

impl FileInfo {
    /// `modified  size  name`, with a blank time if the platform doesn't report one.
    #[must_use]
    pub fn listing_row(&self) -> String {
        let modified = self.modified.map_or_else(
            || " ".repeat(19),
            |it| it.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        format!("{modified}  {:>10}  {}", self.size, self.name)
    }

    #[must_use]
    pub fn stat_row(&self) -> String {
        match self.modified {
            Some(modified) => format!(
                "{}: {} bytes, modified {}",
                self.name,
                self.size,
                modified.format("%Y-%m-%d %H:%M:%S")
            ),
            None => format!("{}: {} bytes", self.name, self.size),
        }
    }
}

/// Metadata of `name`, relative to `root`.
///
/// # Errors
///
/// Returns an error if `name` doesn't exist or isn't a regular file.
pub async fn stat_file(root: &Path, name: &str) -> io::Result<FileInfo> {
    let metadata = tokio::fs::metadata(root.join(name)).await?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} is not a file"),
        ));
    }
    Ok(FileInfo {
        name: name.to_owned(),
        size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
    })
}
