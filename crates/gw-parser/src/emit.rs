//! Writes the generic line tree, or preserved custom facts, back out as GEDCOM lines.
//!
//! Multi-line values are split on `\n` into `CONT` lines one level deeper. `CONC`
//! is never produced, so the output is a normalised form of the input.

use std::fmt::Write as _;

use gw_core::{CustomFact, StringTree};

const LINE_TERMINATOR: &str = "\n";

fn write_line(out: &mut String, level: u32, xref: Option<&str>, tag: &str, value: Option<&str>) {
    let mut parts = value.map(|value| value.split('\n'));
    let first = parts.as_mut().and_then(|parts| parts.next());

    let _ = write!(out, "{level}");
    if let Some(xref) = xref {
        let _ = write!(out, " {xref}");
    }
    let _ = write!(out, " {tag}");
    if let Some(first) = first.filter(|text| !text.is_empty()) {
        let _ = write!(out, " {first}");
    }
    out.push_str(LINE_TERMINATOR);

    for continued in parts.into_iter().flatten() {
        let _ = write!(out, "{} CONT", level + 1);
        if !continued.is_empty() {
            let _ = write!(out, " {continued}");
        }
        out.push_str(LINE_TERMINATOR);
    }
}

/// Every node of `tree` in file order.
#[must_use]
pub fn write_tree(tree: &StringTree) -> String {
    let mut out = String::new();
    for id in tree.preorder() {
        let node = tree.node(id);
        write_line(
            &mut out,
            node.level,
            node.xref.as_deref(),
            &node.tag,
            node.value.as_deref(),
        );
    }
    out
}

/// A custom fact and its subtree, with the fact itself at `level`.
#[must_use]
pub fn write_custom_fact(fact: &CustomFact, level: u32) -> String {
    let mut out = String::new();
    push_custom_fact(&mut out, fact, level);
    out
}

/// Several custom facts at the same level, in order.
#[must_use]
pub fn write_custom_facts(facts: &[CustomFact], level: u32) -> String {
    let mut out = String::new();
    for fact in facts {
        push_custom_fact(&mut out, fact, level);
    }
    out
}

fn push_custom_fact(out: &mut String, fact: &CustomFact, level: u32) {
    write_line(
        out,
        level,
        fact.xref.as_deref(),
        &fact.tag,
        fact.value.as_deref(),
    );
    for child in &fact.children {
        push_custom_fact(out, child, level + 1);
    }
}
