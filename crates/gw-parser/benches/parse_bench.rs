use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use gw_parser::parse_bytes;

/// A synthetic file of `families` nuclear families, each with two parents and
/// three children, linked in both directions.
fn synthetic_gedcom(families: usize) -> String {
    let mut out = String::from("0 HEAD\n1 SOUR bench\n1 GEDC\n2 VERS 5.5.1\n1 CHAR UTF-8\n");
    for family in 0..families {
        let base = family * 5;
        let _ = writeln!(out, "0 @F{family}@ FAM\n1 HUSB @I{base}@\n1 WIFE @I{}@", base + 1);
        for child in 2..5 {
            let _ = writeln!(out, "1 CHIL @I{}@", base + child);
        }
        let _ = writeln!(out, "1 MARR\n2 DATE 1 JAN 1900\n2 PLAC Somewhere");
        for member in 0..5 {
            let sex = if member % 2 == 0 { "M" } else { "F" };
            let _ = writeln!(
                out,
                "0 @I{}@ INDI\n1 NAME Person{member} /Family{family}/\n1 SEX {sex}\n1 BIRT\n2 DATE {} \n1 NOTE Line one\n2 CONT line two\n1 _CUSTOM kept",
                base + member,
                1850 + member
            );
        }
    }
    out.push_str("0 TRLR\n");
    out
}

fn parse_small(c: &mut Criterion) {
    let input = synthetic_gedcom(20);
    c.bench_function("parse_100_individuals", |b| {
        b.iter(|| parse_bytes(black_box(input.as_bytes())));
    });
}

fn parse_large(c: &mut Criterion) {
    let input = synthetic_gedcom(2_000);
    c.bench_function("parse_10k_individuals", |b| {
        b.iter(|| parse_bytes(black_box(input.as_bytes())));
    });
}

criterion_group!(small, parse_small);
criterion_group! {
    name = large;
    config = Criterion::default().sample_size(10);
    targets = parse_large
}
criterion_main!(small, large);
