//! Interactive operator prompts
//!
//! Line-based selection of the base branch and the run mode, used when the
//! tool is invoked without a subcommand. Typing filters the enumerated
//! branches; a number, an exact name, or a uniquely-matching fragment picks
//! one, and empty input accepts the default.

use std::io::{Write, stdin, stdout};

use crate::error::Result;
use crate::sweep::RunMode;

/// How a line of operator input maps onto the enumerated branches
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Chosen(String),
    NoMatch,
    Ambiguous(Vec<String>),
}

/// Ask the operator which base branch to sweep against
///
/// Candidates are shown in ref-store order. `default` is accepted on empty
/// input (and on EOF, so piped invocations don't hang on a closed stdin).
pub fn select_base_branch(branches: &[String], default: &str) -> Result<String> {
    let mut out = stdout();

    writeln!(out, "Local branches:")?;
    for (i, branch) in branches.iter().enumerate() {
        let marker = if branch == default { "*" } else { " " };
        writeln!(out, "  {} {:>2}) {}", marker, i + 1, branch)?;
    }

    loop {
        write!(
            out,
            "Base branch to check against [{}] (name, fragment or number): ",
            default
        )?;
        out.flush()?;

        let mut input = String::new();
        let bytes = stdin().read_line(&mut input)?;
        if bytes == 0 {
            // EOF
            writeln!(out)?;
            return Ok(default.to_string());
        }

        match resolve_selection(branches, input.trim(), default) {
            Selection::Chosen(branch) => return Ok(branch),
            Selection::NoMatch => {
                writeln!(out, "No branch matches {:?}.", input.trim())?;
            }
            Selection::Ambiguous(matches) => {
                writeln!(out, "Ambiguous, matches: {}", matches.join(", "))?;
            }
        }
    }
}

/// Ask the operator what to do with the branches the sweep flags
pub fn select_mode() -> Result<RunMode> {
    let mut out = stdout();

    loop {
        write!(
            out,
            "What to do with squash-merged branches? [L]ist them / [d]elete them: "
        )?;
        out.flush()?;

        let mut input = String::new();
        let bytes = stdin().read_line(&mut input)?;
        if bytes == 0 {
            // EOF: report only, never delete without an explicit answer
            writeln!(out)?;
            return Ok(RunMode::List);
        }

        match parse_mode(input.trim()) {
            Some(mode) => return Ok(mode),
            None => {
                writeln!(out, "Please answer 'l' (list) or 'd' (delete).")?;
            }
        }
    }
}

fn resolve_selection(branches: &[String], input: &str, default: &str) -> Selection {
    if input.is_empty() {
        return Selection::Chosen(default.to_string());
    }

    // Exact name wins over everything, so one branch name being a
    // substring of another stays selectable.
    if let Some(branch) = branches.iter().find(|b| b.as_str() == input) {
        return Selection::Chosen(branch.clone());
    }

    if let Ok(index) = input.parse::<usize>() {
        if index >= 1 && index <= branches.len() {
            return Selection::Chosen(branches[index - 1].clone());
        }
        return Selection::NoMatch;
    }

    let matches: Vec<&String> = branches.iter().filter(|b| b.contains(input)).collect();
    match matches.as_slice() {
        [] => Selection::NoMatch,
        [single] => Selection::Chosen((*single).clone()),
        many => Selection::Ambiguous(many.iter().map(|b| (*b).clone()).collect()),
    }
}

fn parse_mode(input: &str) -> Option<RunMode> {
    match input.to_lowercase().as_str() {
        "" | "l" | "list" => Some(RunMode::List),
        "d" | "delete" => Some(RunMode::Delete),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn branches() -> Vec<String> {
        ["main", "feature/login", "feature/logout", "hotfix"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_empty_input_takes_default() {
        assert_eq!(
            resolve_selection(&branches(), "", "main"),
            Selection::Chosen("main".to_string())
        );
    }

    #[test]
    fn test_exact_name() {
        assert_eq!(
            resolve_selection(&branches(), "hotfix", "main"),
            Selection::Chosen("hotfix".to_string())
        );
    }

    #[test]
    fn test_index_selection() {
        assert_eq!(
            resolve_selection(&branches(), "2", "main"),
            Selection::Chosen("feature/login".to_string())
        );
        assert_eq!(resolve_selection(&branches(), "0", "main"), Selection::NoMatch);
        assert_eq!(resolve_selection(&branches(), "9", "main"), Selection::NoMatch);
    }

    #[test]
    fn test_unique_fragment() {
        assert_eq!(
            resolve_selection(&branches(), "login", "main"),
            Selection::Chosen("feature/login".to_string())
        );
    }

    #[test]
    fn test_ambiguous_fragment_lists_matches() {
        let selection = resolve_selection(&branches(), "feature", "main");
        assert_eq!(
            selection,
            Selection::Ambiguous(vec![
                "feature/login".to_string(),
                "feature/logout".to_string()
            ])
        );
    }

    #[test]
    fn test_exact_name_beats_fragment() {
        let branches: Vec<String> = vec!["main".to_string(), "main-backup".to_string()];
        assert_eq!(
            resolve_selection(&branches, "main", "main-backup"),
            Selection::Chosen("main".to_string())
        );
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(""), Some(RunMode::List));
        assert_eq!(parse_mode("l"), Some(RunMode::List));
        assert_eq!(parse_mode("LIST"), Some(RunMode::List));
        assert_eq!(parse_mode("d"), Some(RunMode::Delete));
        assert_eq!(parse_mode("Delete"), Some(RunMode::Delete));
        assert_eq!(parse_mode("x"), None);
    }
}
