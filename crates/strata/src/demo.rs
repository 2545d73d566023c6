//! The console walkthrough run by the `strata-demo` binary.
//!
//! Writes the first ten factorials through a `BTreeMap` and through an
//! [`OrderedMap`] over an arena, then the digits 0..9 through an
//! [`ArenaVec`] over each provider.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};
use std::io::{self, Write};

use strata_arena::{ArenaAllocator, FreeListAllocator};
use strata_collections::{ArenaVec, OrderedMap};
use strata_core::ArenaError;

/// Number of entries each demo section prints.
pub const DEMO_LEN: u64 = 10;

/// `n!`, saturating at `u64::MAX`.
pub fn factorial(n: u64) -> u64 {
    (1..=n).try_fold(1u64, |acc, k| acc.checked_mul(k)).unwrap_or(u64::MAX)
}

/// Errors from [`run`].
#[derive(Debug)]
pub enum DemoError {
    /// A container or provider operation failed.
    Arena(ArenaError),
    /// Writing to the output failed.
    Io(io::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(err) => write!(f, "arena: {err}"),
            Self::Io(err) => write!(f, "output: {err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ArenaError> for DemoError {
    fn from(err: ArenaError) -> Self {
        Self::Arena(err)
    }
}

impl From<io::Error> for DemoError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

fn write_pairs<'a, W, K, V>(
    out: &mut W,
    pairs: impl IntoIterator<Item = (&'a K, &'a V)>,
) -> io::Result<()>
where
    W: Write,
    K: Display + 'a,
    V: Display + 'a,
{
    for (key, value) in pairs {
        writeln!(out, "{key} {value}")?;
    }
    Ok(())
}

fn write_sequence<'a, W, T>(out: &mut W, items: impl IntoIterator<Item = &'a T>) -> io::Result<()>
where
    W: Write,
    T: Display + 'a,
{
    let line: Vec<String> = items.into_iter().map(ToString::to_string).collect();
    writeln!(out, "{}", line.join(" "))
}

/// Write the walkthrough to `out`.
pub fn run<W: Write>(out: &mut W) -> Result<(), DemoError> {
    writeln!(out, "BTreeMap")?;
    let std_map: BTreeMap<u64, u64> = (0..DEMO_LEN).map(|i| (i, factorial(i))).collect();
    write_pairs(out, &std_map)?;

    writeln!(out, "OrderedMap over ArenaAllocator")?;
    let mut map = OrderedMap::new_in(ArenaAllocator::with_capacity(10)?)?;
    for i in 0..DEMO_LEN {
        *map.get_or_insert_with(i, || 0)? = factorial(i);
    }
    write_pairs(out, &map)?;

    writeln!(out, "ArenaVec over FreeListAllocator")?;
    let mut plain = ArenaVec::new_in(FreeListAllocator::default())?;
    plain.try_extend(0..DEMO_LEN)?;
    write_sequence(out, &plain)?;

    writeln!(out, "ArenaVec over ArenaAllocator")?;
    let mut arena_backed = ArenaVec::with_capacity_in(10, ArenaAllocator::with_capacity(10)?)?;
    arena_backed.try_extend(0..DEMO_LEN)?;
    write_sequence(out, &arena_backed)?;

    tracing::info!(
        map_nodes = map.node_allocator().used(),
        vec_slots = arena_backed.allocator().used(),
        "demo finished"
    );
    Ok(())
}
