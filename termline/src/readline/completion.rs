// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::COMPLETION_COLUMN_GUTTER;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use miette::Diagnostic;
use std::future::Future;
use unicode_width::UnicodeWidthStr as _;

/// Command names, each with its ordered list of valid arguments. A fresh set is fetched
/// from the [`CompletionSource`] on every tab press and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionCandidateSet {
    commands: Vec<(String, Vec<String>)>,
}

impl CompletionCandidateSet {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add (or replace) a command and its arguments. Insertion order is kept.
    #[must_use]
    pub fn with_command(
        mut self,
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let name = name.into();
        let arguments = arguments.into_iter().map(Into::into).collect();
        match self.commands.iter_mut().find(|(it, _)| *it == name) {
            Some((_, existing)) => *existing = arguments,
            None => self.commands.push((name, arguments)),
        }
        self
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn arguments_for(&self, command: &str) -> Option<&[String]> {
        self.commands
            .iter()
            .find(|(name, _)| name == command)
            .map(|(_, arguments)| arguments.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CompletionError {
    #[error("completion source I/O failed")]
    #[diagnostic(code(termline::completion::io))]
    Io(#[from] std::io::Error),

    #[error("completion source unavailable: {0}")]
    #[diagnostic(
        code(termline::completion::unavailable),
        help("the candidate set is fetched again on the next tab press")
    )]
    Unavailable(String),
}

/// An in-flight lookup, owned by the editor until its result lands.
pub type CompletionFuture = BoxFuture<'static, Result<CompletionCandidateSet, CompletionError>>;

/// Supplies candidates for tab completion. Any `Fn() -> impl Future` closure works.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn fetch_candidates(&self) -> Result<CompletionCandidateSet, CompletionError>;
}

#[async_trait]
impl<F, Fut> CompletionSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<CompletionCandidateSet, CompletionError>> + Send + 'static,
{
    async fn fetch_candidates(&self) -> Result<CompletionCandidateSet, CompletionError> {
        self().await
    }
}

/// What a tab press does with the line it was pressed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Nothing matched, or the leading command isn't known.
    NoMatch,
    /// Exactly one match. Holds the whole new line.
    Complete(String),
    /// Several matches that share more than what was typed. Holds the whole new line.
    Extend(String),
    /// Several matches and nothing more to add. Holds the matches in source order.
    Ambiguous(Vec<String>),
}

/// Match the last token of `line` against `candidates`.
///
/// With no space in the line, the whole line is matched against the command names.
/// Otherwise the last token is matched against the arguments of the first token.
#[must_use]
pub fn resolve_completion(line: &str, candidates: &CompletionCandidateSet) -> CompletionOutcome {
    let (head, target, pool): (&str, &str, Vec<&str>) = match line.rfind(' ') {
        None => ("", line, candidates.command_names().collect()),
        Some(last_space) => {
            let command = line.split(' ').next().unwrap_or_default();
            let Some(arguments) = candidates.arguments_for(command) else {
                return CompletionOutcome::NoMatch;
            };
            (
                &line[..=last_space],
                &line[last_space + 1..],
                arguments.iter().map(String::as_str).collect(),
            )
        }
    };

    let matches: Vec<&str> = pool
        .into_iter()
        .filter(|candidate| candidate.starts_with(target))
        .collect();

    match matches.as_slice() {
        [] => CompletionOutcome::NoMatch,
        [only] => CompletionOutcome::Complete(format!("{head}{only}")),
        _ => {
            let shared = longest_common_prefix(&matches);
            if shared.chars().count() > target.chars().count() {
                CompletionOutcome::Extend(format!("{head}{shared}"))
            } else {
                CompletionOutcome::Ambiguous(matches.into_iter().map(str::to_owned).collect())
            }
        }
    }
}

/// Longest prefix shared by every string, on `char` boundaries.
#[must_use]
pub fn longest_common_prefix<'a>(strings: &[&'a str]) -> &'a str {
    let Some((&first, rest)) = strings.split_first() else {
        return "";
    };
    let mut end = first.len();
    for other in rest {
        end = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((offset, ch), _)| offset + ch.len_utf8())
            .min(end);
    }
    &first[..end]
}

/// Lay candidates out in rows for a terminal `width` columns wide. Every cell is as wide
/// as the longest candidate plus the gutter, and there is always at least one column.
#[must_use]
pub fn format_columns(candidates: &[String], width: u16) -> Vec<String> {
    let column_width = candidates.iter().map(|it| it.width()).max().unwrap_or(0)
        + COMPLETION_COLUMN_GUTTER;
    let column_count = (usize::from(width) / column_width).max(1);

    candidates
        .chunks(column_count)
        .map(|row| {
            row.iter()
                .map(|candidate| {
                    let padding = column_width.saturating_sub(candidate.width());
                    format!("{candidate}{}", " ".repeat(padding))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn candidates() -> CompletionCandidateSet {
        CompletionCandidateSet::new()
            .with_command("push", ["foobar", "foobaz", "build"])
            .with_command("pull", ["build"])
            .with_command("help", Vec::<String>::new())
    }

    #[test_case("push foo", CompletionOutcome::Extend("push fooba".into()))]
    #[test_case("push b", CompletionOutcome::Complete("push build".into()))]
    #[test_case("push x", CompletionOutcome::NoMatch)]
    #[test_case("nope b", CompletionOutcome::NoMatch)]
    #[test_case("help x", CompletionOutcome::NoMatch)]
    #[test_case("h", CompletionOutcome::Complete("help".into()))]
    #[test_case("pu", CompletionOutcome::Ambiguous(vec!["push".into(), "pull".into()]))]
    fn test_resolve(line: &str, expected: CompletionOutcome) {
        assert_eq!(resolve_completion(line, &candidates()), expected);
    }

    #[test]
    fn test_resolve_at_shared_prefix_is_ambiguous() {
        assert_eq!(
            resolve_completion("push fooba", &candidates()),
            CompletionOutcome::Ambiguous(vec!["foobar".into(), "foobaz".into()])
        );
    }

    #[test]
    fn test_resolve_uses_first_token_as_key() {
        assert_eq!(
            resolve_completion("pull x b", &candidates()),
            CompletionOutcome::Complete("pull x build".into())
        );
    }

    #[test]
    fn test_with_command_replaces() {
        let set = CompletionCandidateSet::new()
            .with_command("ls", ["a"])
            .with_command("ls", ["b"]);
        assert_eq!(set.command_names().collect::<Vec<_>>(), vec!["ls"]);
        assert_eq!(set.arguments_for("ls"), Some(&["b".to_string()][..]));
    }

    #[test_case(&["foobar", "foobaz"], "fooba")]
    #[test_case(&["abc"], "abc")]
    #[test_case(&["abc", "xyz"], "")]
    #[test_case(&["ab", "abc", "a"], "a")]
    #[test_case(&["añx", "añy"], "añ")]
    #[test_case(&[], "")]
    fn test_longest_common_prefix(input: &[&str], expected: &str) {
        assert_eq!(longest_common_prefix(input), expected);
    }

    #[test]
    fn test_format_columns() {
        let items: Vec<String> = ["foobar", "foobaz", "x"].map(String::from).to_vec();
        // Cells are 6 + 5 = 11 wide, so 25 columns fit two per row.
        assert_eq!(format_columns(&items, 25), vec![
            "foobar     foobaz     ".to_string(),
            "x          ".to_string(),
        ]);
        // Narrower than one cell still gets one column.
        assert_eq!(format_columns(&items, 4).len(), 3);
    }

    #[tokio::test]
    async fn test_closure_is_a_source() {
        let source = || async {
            Ok::<_, CompletionError>(CompletionCandidateSet::new().with_command("ls", ["a"]))
        };
        let set = source.fetch_candidates().await.unwrap();
        assert_eq!(set.arguments_for("ls").map(<[String]>::len), Some(1));

        let failing = || async {
            Err::<CompletionCandidateSet, _>(CompletionError::Unavailable("offline".into()))
        };
        assert!(failing.fetch_candidates().await.is_err());
    }
}
