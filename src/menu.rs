//! An interactive text menu for building and editing a tree of integer keys.
//!
//! The menu reads commands from any [`BufRead`] and writes prompts and results to any [`Write`],
//! so the `avl-menu` binary drives it with stdin/stdout and tests drive it with byte buffers. All
//! the tree logic lives in [`Tree`]; this module only parses input and prints what the tree
//! reports.
//!
//! # Examples
//!
//! ```
//! use avl::menu::Session;
//!
//! let input = "1\n10,20,30\n4\n";
//! let mut output = Vec::new();
//! Session::new().run(input.as_bytes(), &mut output).unwrap();
//!
//! let output = String::from_utf8(output).unwrap();
//! assert!(output.contains("Single left rotation (RR) due to node 10"));
//! assert!(output.contains("Node Degrees: 20(2), 10(0), 30(0)"));
//! ```

use std::io::{BufRead, Write};
use std::num::ParseIntError;
use std::str::FromStr;

use anyhow::Result;
use log::info;
use thiserror::Error;

use crate::report::{Report, Rotation, RotationKind};
use crate::shape::Side;
use crate::Tree;

/// The key type the menu works with.
pub type Key = i64;

/// Something the user typed that the menu couldn't act on. None of these end the session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// The menu choice wasn't one of the listed options.
    #[error("invalid choice {0:?}")]
    InvalidChoice(String),
    /// A key wasn't an integer.
    #[error("invalid key {input:?}: {source}")]
    InvalidKey {
        /// What was typed.
        input: String,
        /// Why it didn't parse.
        #[source]
        source: ParseIntError,
    },
    /// Insert or remove was chosen before a tree was created.
    #[error("Please create an AVL tree first.")]
    NoTree,
}

/// One of the menu's options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Build a new tree from a list of keys.
    Create,
    /// Insert one key.
    Insert,
    /// Remove one key.
    Remove,
    /// Leave the menu.
    Exit,
}

impl FromStr for Choice {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Create),
            "2" => Ok(Self::Insert),
            "3" => Ok(Self::Remove),
            "4" => Ok(Self::Exit),
            other => Err(MenuError::InvalidChoice(other.to_string())),
        }
    }
}

/// Parses a single key, ignoring surrounding whitespace.
pub fn parse_key(input: &str) -> Result<Key, MenuError> {
    let input = input.trim();
    input.parse().map_err(|source| MenuError::InvalidKey {
        input: input.to_string(),
        source,
    })
}

/// Parses a comma-separated list of keys. Empty entries (e.g. from a trailing comma) are skipped.
pub fn parse_keys(input: &str) -> Result<Vec<Key>, MenuError> {
    input
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_key)
        .collect()
}

/// The menu's state: the tree being edited, once one has been created.
#[derive(Debug, Default)]
pub struct Session {
    tree: Option<Tree<Key>>,
}

impl Session {
    /// A session with no tree yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tree, if one has been created.
    pub fn tree(&self) -> Option<&Tree<Key>> {
        self.tree.as_ref()
    }

    /// Replaces the current tree with one built by inserting `keys` in order. Returns the lines to
    /// show the user.
    pub fn create(&mut self, keys: &[Key]) -> Vec<String> {
        info!("creating tree from {} keys", keys.len());
        let mut tree = Tree::new();
        let mut lines = Vec::new();
        for &key in keys {
            let report = tree.insert(key);
            insert_lines(&mut lines, &tree, key, &report);
        }
        lines.push("AVL tree created.".to_string());
        lines.push(degree_line(&tree));
        self.tree = Some(tree);
        lines
    }

    /// Inserts `key` into the current tree. Returns the lines to show the user.
    pub fn insert(&mut self, key: Key) -> Result<Vec<String>, MenuError> {
        let tree = self.tree.as_mut().ok_or(MenuError::NoTree)?;
        info!("inserting {}", key);
        let report = tree.insert(key);
        let mut lines = Vec::new();
        insert_lines(&mut lines, tree, key, &report);
        Ok(lines)
    }

    /// Removes `key` from the current tree. Returns the lines to show the user.
    pub fn remove(&mut self, key: Key) -> Result<Vec<String>, MenuError> {
        let tree = self.tree.as_mut().ok_or(MenuError::NoTree)?;
        info!("removing {}", key);
        let mut lines = vec![format!("Removing node {}", key)];
        match tree.delete(&key) {
            Some(report) => lines.extend(report.rotations().iter().map(rotation_line)),
            None => lines.push(format!("Node {} not found", key)),
        }
        lines.push(degree_line(tree));
        Ok(lines)
    }

    /// Runs the menu until the user exits or `input` runs out.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        loop {
            writeln!(output)?;
            writeln!(output, "Options:")?;
            writeln!(output, "1. Create AVL tree")?;
            writeln!(output, "2. Insert a node")?;
            writeln!(output, "3. Remove a node")?;
            writeln!(output, "4. Exit")?;

            let Some(choice) = prompt(&mut input, &mut output, "Enter your choice: ")? else {
                return Ok(());
            };
            let lines = match choice.parse::<Choice>() {
                Ok(Choice::Exit) => return Ok(()),
                Ok(Choice::Create) => {
                    let Some(line) =
                        prompt(&mut input, &mut output, "Enter the nodes (comma-separated): ")?
                    else {
                        return Ok(());
                    };
                    parse_keys(&line).map(|keys| self.create(&keys))
                }
                Ok(_) if self.tree.is_none() => Err(MenuError::NoTree),
                Ok(choice) => {
                    let text = if choice == Choice::Insert {
                        "Enter the value to insert: "
                    } else {
                        "Enter the value to remove: "
                    };
                    let Some(line) = prompt(&mut input, &mut output, text)? else {
                        return Ok(());
                    };
                    parse_key(&line).and_then(|key| {
                        if choice == Choice::Insert {
                            self.insert(key)
                        } else {
                            self.remove(key)
                        }
                    })
                }
                Err(e) => Err(e),
            };

            match lines {
                Ok(lines) => {
                    for line in lines {
                        writeln!(output, "{}", line)?;
                    }
                }
                Err(MenuError::InvalidChoice(_)) => {
                    writeln!(output, "Invalid choice. Please try again.")?
                }
                Err(e) => writeln!(output, "{}", e)?,
            }
        }
    }
}

/// Writes `text` and reads one line. `None` means the input is exhausted.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn insert_lines(lines: &mut Vec<String>, tree: &Tree<Key>, key: Key, report: &Report<Key>) {
    lines.push(format!("Inserting node {}", key));
    if report.rotated() {
        lines.extend(report.rotations().iter().map(rotation_line));
    } else {
        lines.push("No rotation required".to_string());
    }
    lines.push(degree_line(tree));
}

fn describe(kind: RotationKind) -> &'static str {
    match kind {
        RotationKind::SingleLeft => "Single left rotation (RR)",
        RotationKind::SingleRight => "Single right rotation (LL)",
        RotationKind::DoubleLeftRight => "Double rotation - Left right rotation (LR)",
        RotationKind::DoubleRightLeft => "Double rotation - Right left rotation (RL)",
    }
}

fn rotation_line(rotation: &Rotation<Key>) -> String {
    let side = match rotation.kind.heavy_side() {
        Side::Left => "left",
        Side::Right => "right",
    };
    format!(
        "Rotation needed: {} due to node {} being {} heavy with a balance factor of {}",
        describe(rotation.kind),
        rotation.pivot,
        side,
        rotation.balance
    )
}

/// Every node as `key(degree)`, in pre-order.
fn degree_line(tree: &Tree<Key>) -> String {
    let degrees = tree
        .shape()
        .nodes
        .iter()
        .map(|n| format!("{}({})", n.key, n.degree))
        .collect::<Vec<_>>();
    format!("Node Degrees: {}", degrees.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> String {
        let mut output = Vec::new();
        Session::new().run(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_choices() {
        assert_eq!(" 1 ".parse::<Choice>(), Ok(Choice::Create));
        assert_eq!("4".parse::<Choice>(), Ok(Choice::Exit));
        assert_eq!(
            "9".parse::<Choice>(),
            Err(MenuError::InvalidChoice("9".to_string()))
        );
    }

    #[test]
    fn parses_keys() {
        assert_eq!(parse_keys("3, 1,2,"), Ok(vec![3, 1, 2]));
        assert_eq!(parse_keys(""), Ok(vec![]));
        assert!(matches!(
            parse_keys("1,x"),
            Err(MenuError::InvalidKey { input, .. }) if input == "x"
        ));
    }

    #[test]
    fn create_reports_every_insert() {
        let mut session = Session::new();
        let lines = session.create(&[30, 10, 20]);

        assert_eq!(
            lines,
            [
                "Inserting node 30",
                "No rotation required",
                "Node Degrees: 30(0)",
                "Inserting node 10",
                "No rotation required",
                "Node Degrees: 30(1), 10(0)",
                "Inserting node 20",
                "Rotation needed: Double rotation - Left right rotation (LR) due to node 30 being left heavy with a balance factor of 2",
                "Node Degrees: 20(2), 10(0), 30(0)",
                "AVL tree created.",
                "Node Degrees: 20(2), 10(0), 30(0)",
            ]
        );
        assert_eq!(session.tree().map(Tree::len), Some(3));
    }

    #[test]
    fn insert_and_remove_need_a_tree() {
        let mut session = Session::new();

        assert_eq!(session.insert(1), Err(MenuError::NoTree));
        assert_eq!(session.remove(1), Err(MenuError::NoTree));
    }

    #[test]
    fn remove_reports_rotations() {
        let mut session = Session::new();
        let _ = session.create(&[5, 2, 8, 7]);

        assert_eq!(
            session.remove(2).unwrap(),
            [
                "Removing node 2",
                "Rotation needed: Double rotation - Right left rotation (RL) due to node 5 being right heavy with a balance factor of -2",
                "Node Degrees: 7(2), 5(0), 8(0)",
            ]
        );
        assert_eq!(
            session.remove(2).unwrap(),
            [
                "Removing node 2",
                "Node 2 not found",
                "Node Degrees: 7(2), 5(0), 8(0)",
            ]
        );
    }

    #[test]
    fn menu_loop() {
        let output = run("2\n1\n1, 2\n2\n3\n3\n1\n7\nabc\n4\n");

        assert!(output.contains("Please create an AVL tree first."));
        assert!(output.contains("AVL tree created."));
        assert!(output.contains(
            "Rotation needed: Single left rotation (RR) due to node 1 being right heavy with a balance factor of -2"
        ));
        assert!(output.contains("Removing node 1\nNode Degrees: 2(1), 3(0)"));
        assert!(output.contains("Invalid choice. Please try again."));
        assert!(output.ends_with("Enter your choice: "));
    }

    #[test]
    fn bad_key_keeps_going() {
        let output = run("1\n1,two\n2\n5\n");

        assert!(output.contains("invalid key \"two\""));
        assert!(output.contains("Please create an AVL tree first."));
    }

    #[test]
    fn end_of_input_exits() {
        let output = run("1\n");
        assert!(output.ends_with("Enter the nodes (comma-separated): "));
    }
}
