#![forbid(unsafe_code)]

//! Kinship queries over a resolved [`Gedcom`] graph.
//!
//! Every walk keeps an explicit visited set and checks it before enqueueing, so
//! cyclic data (which real files do contain) always terminates. The start person is
//! only part of a result when a cycle leads back to them.

use std::collections::{BTreeSet, VecDeque};

use gw_core::model::{Family, Individual};
use gw_core::{Gedcom, Pointer, Xref};
use rustc_hash::FxHashSet;
use tracing::trace;

fn resolved_xref(pointer: &Pointer) -> Option<&Xref> {
    pointer.is_resolved().then_some(&pointer.xref)
}

fn families_as_child<'g>(
    gedcom: &'g Gedcom,
    person: &'g Individual,
) -> impl Iterator<Item = &'g Family> + 'g {
    person
        .child_of_families
        .iter()
        .filter(|link| link.family.is_resolved())
        .filter_map(move |link| gedcom.resolve_family(&link.family))
}

fn families_as_spouse<'g>(
    gedcom: &'g Gedcom,
    person: &'g Individual,
) -> impl Iterator<Item = &'g Family> + 'g {
    person
        .spouse_of_families
        .iter()
        .filter(|link| link.family.is_resolved())
        .filter_map(move |link| gedcom.resolve_family(&link.family))
}

fn parent_xrefs<'g>(gedcom: &'g Gedcom, person: &'g Individual) -> impl Iterator<Item = &'g Xref> + 'g {
    families_as_child(gedcom, person)
        .flat_map(|family| family.spouses())
        .filter_map(resolved_xref)
}

fn child_xrefs<'g>(gedcom: &'g Gedcom, person: &'g Individual) -> impl Iterator<Item = &'g Xref> + 'g {
    families_as_spouse(gedcom, person)
        .flat_map(|family| family.children.iter())
        .filter_map(resolved_xref)
}

/// Breadth-first walk from `start`, following `next` until nothing new is reached.
fn walk<'g, I>(
    gedcom: &'g Gedcom,
    start: &str,
    next: impl Fn(&'g Individual) -> I,
) -> FxHashSet<&'g str>
where
    I: Iterator<Item = &'g Xref>,
{
    let mut visited: FxHashSet<&'g str> = FxHashSet::default();
    let mut queue: VecDeque<&'g Individual> = gedcom.individual(start).into_iter().collect();
    while let Some(person) = queue.pop_front() {
        for xref in next(person) {
            if !visited.insert(xref.as_str()) {
                continue;
            }
            if let Some(found) = gedcom.individual(xref.as_str()) {
                queue.push_back(found);
            }
        }
    }
    visited
}

fn into_xrefs(found: FxHashSet<&str>) -> BTreeSet<Xref> {
    found.into_iter().map(Xref::from).collect()
}

/// Everyone reachable through parent links.
#[must_use]
pub fn ancestors(gedcom: &Gedcom, individual: &str) -> BTreeSet<Xref> {
    let found = walk(gedcom, individual, |person| parent_xrefs(gedcom, person));
    trace!(individual, count = found.len(), "ancestors");
    into_xrefs(found)
}

/// Everyone reachable through child links.
#[must_use]
pub fn descendants(gedcom: &Gedcom, individual: &str) -> BTreeSet<Xref> {
    let found = walk(gedcom, individual, |person| child_xrefs(gedcom, person));
    trace!(individual, count = found.len(), "descendants");
    into_xrefs(found)
}

/// Husbands and wives of every family the individual is a child in.
#[must_use]
pub fn parents(gedcom: &Gedcom, individual: &str) -> BTreeSet<Xref> {
    gedcom
        .individual(individual)
        .map(|person| parent_xrefs(gedcom, person).cloned().collect())
        .unwrap_or_default()
}

/// Children of every family the individual is a spouse in.
#[must_use]
pub fn children(gedcom: &Gedcom, individual: &str) -> BTreeSet<Xref> {
    gedcom
        .individual(individual)
        .map(|person| child_xrefs(gedcom, person).cloned().collect())
        .unwrap_or_default()
}

/// The other spouse of every family the individual is a spouse in.
#[must_use]
pub fn spouses(gedcom: &Gedcom, individual: &str) -> BTreeSet<Xref> {
    let Some(person) = gedcom.individual(individual) else {
        return BTreeSet::new();
    };
    families_as_spouse(gedcom, person)
        .flat_map(|family| family.spouses())
        .filter_map(resolved_xref)
        .filter(|xref| xref.as_str() != individual)
        .cloned()
        .collect()
}

/// Other children of the families the individual is a child in. Half siblings
/// through a second family are included.
#[must_use]
pub fn siblings(gedcom: &Gedcom, individual: &str) -> BTreeSet<Xref> {
    let Some(person) = gedcom.individual(individual) else {
        return BTreeSet::new();
    };
    families_as_child(gedcom, person)
        .flat_map(|family| family.children.iter())
        .filter_map(resolved_xref)
        .filter(|xref| xref.as_str() != individual)
        .cloned()
        .collect()
}

/// Whether `ancestor` is reachable from `descendant` through parent links.
#[must_use]
pub fn is_ancestor_of(gedcom: &Gedcom, ancestor: &str, descendant: &str) -> bool {
    walk(gedcom, descendant, |person| parent_xrefs(gedcom, person)).contains(ancestor)
}
