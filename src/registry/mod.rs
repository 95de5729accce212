//! Whitelisted math functions available to formulas.
//!
//! The table is the safety boundary that keeps formulas from invoking
//! arbitrary host code: it is built once at first use, never extended at
//! runtime, and every entry maps straight onto an `f64` operation. Arity is
//! not validated; a missing operand yields NaN (and `min()`/`max()` of
//! nothing yield an infinity), which the API boundary turns into a failed
//! evaluation via the non-finite check.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Signature shared by every whitelisted function.
pub type MathFn = fn(&[f64]) -> f64;

static FUNCTIONS: Lazy<FxHashMap<&'static str, MathFn>> = Lazy::new(|| {
    let mut map: FxHashMap<&'static str, MathFn> = FxHashMap::default();
    map.insert("abs", abs as MathFn);
    map.insert("min", min as MathFn);
    map.insert("max", max as MathFn);
    map.insert("round", round as MathFn);
    map.insert("floor", floor as MathFn);
    map.insert("ceil", ceil as MathFn);
    map.insert("sqrt", sqrt as MathFn);
    map.insert("pow", pow as MathFn);
    map
});

/// Look up a whitelisted function by name.
pub fn lookup(name: &str) -> Option<MathFn> {
    FUNCTIONS.get(name).copied()
}

#[inline]
fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(f64::NAN)
}

fn abs(args: &[f64]) -> f64 {
    arg(args, 0).abs()
}

fn min(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn round(args: &[f64]) -> f64 {
    arg(args, 0).round()
}

fn floor(args: &[f64]) -> f64 {
    arg(args, 0).floor()
}

fn ceil(args: &[f64]) -> f64 {
    arg(args, 0).ceil()
}

fn sqrt(args: &[f64]) -> f64 {
    arg(args, 0).sqrt()
}

fn pow(args: &[f64]) -> f64 {
    arg(args, 0).powf(arg(args, 1))
}
