//! Rescaling of raw sample arrays into clip space and collapsing of flat runs.

use ordered_float::OrderedFloat;
use tracing::{trace, warn};

use crate::core::types::ValueBounds;

/// Half-extent of the normalized range; leaves margin for stroke width and
/// texture bleed at the canvas edges.
pub const DEFAULT_NORMALIZE_SCALE: f64 = 0.925;

/// Spans narrower than this are widened symmetrically by the same amount.
pub const MIN_NORMALIZE_SPAN: f64 = 0.01;

/// Runs of identical values longer than this lose their interior samples.
pub const REDUNDANT_RUN_THRESHOLD: usize = 6;

/// Samples kept at each end of a collapsed run.
pub const REDUNDANT_RUN_KEEP: usize = 3;

/// Returns an owned x sequence: a copy of `x_data`, or `0..N-1` when absent.
#[must_use]
pub fn generate_x_data(y_data: &[f64], x_data: Option<&[f64]>) -> Vec<f64> {
    match x_data {
        Some(x) => x.to_vec(),
        None => (0..y_data.len()).map(|i| i as f64).collect(),
    }
}

/// Min/max over `values`, or `None` for an empty slice.
#[must_use]
pub fn value_bounds(values: &[f64]) -> Option<ValueBounds> {
    let min = values.iter().copied().map(OrderedFloat).min()?;
    let max = values.iter().copied().map(OrderedFloat).max()?;
    Some(ValueBounds::new(min.0, max.0))
}

/// Maps `values` in place onto `[-scale, scale]`, centered at zero.
///
/// `explicit` replaces the computed min/max so repeated renders keep a stable
/// axis. Degenerate spans are widened rather than reported.
pub fn normalize_array(values: &mut [f64], scale: f64, explicit: Option<ValueBounds>) {
    let Some(mut bounds) = explicit.or_else(|| value_bounds(values)) else {
        return;
    };
    if bounds.span() < MIN_NORMALIZE_SPAN {
        warn!(
            min = bounds.min,
            max = bounds.max,
            "widening degenerate normalization range"
        );
        bounds = ValueBounds::new(
            bounds.min - MIN_NORMALIZE_SPAN,
            bounds.max + MIN_NORMALIZE_SPAN,
        );
    }

    let mid = bounds.mid();
    let factor = 2.0 * scale / bounds.span();
    for value in values.iter_mut() {
        *value = (*value - mid) * factor;
    }
}

/// Collapses every run of more than six identical y-values down to its first
/// three and last three samples, removing the same positions from `x_data`.
pub fn remove_redundant(x_data: &mut Vec<f64>, y_data: &mut Vec<f64>) {
    debug_assert_eq!(x_data.len(), y_data.len());

    let mut removals: Vec<(usize, usize)> = Vec::new();
    let mut run_start = 0;
    for i in 1..=y_data.len() {
        if i < y_data.len() && y_data[i] == y_data[run_start] {
            continue;
        }
        let run_len = i - run_start;
        if run_len > REDUNDANT_RUN_THRESHOLD {
            removals.push((
                run_start + REDUNDANT_RUN_KEEP,
                i - REDUNDANT_RUN_KEEP,
            ));
        }
        run_start = i;
    }

    // Back to front so earlier ranges keep their indices.
    for &(start, end) in removals.iter().rev() {
        trace!(start, removed = end - start, "collapse redundant run");
        x_data.drain(start..end);
        y_data.drain(start..end);
    }
}
