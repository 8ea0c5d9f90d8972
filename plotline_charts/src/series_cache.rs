// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily computed values for derived series.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;

use crate::ChartError;

/// Values computed from an inner series, keyed by the inner length.
///
/// The cache recomputes whenever the inner series reports a different length
/// than the one the cached values were computed for. Computing is guarded
/// against re-entry: a derived series that ends up reading itself while
/// computing gets `None` instead of recursing, and the cache remembers that
/// it saw a cycle.
#[derive(Debug)]
pub(crate) struct DerivedCache<T> {
    values: RefCell<Option<(usize, Rc<[T]>)>>,
    busy: Cell<bool>,
    cyclic: Cell<bool>,
}

impl<T> Default for DerivedCache<T> {
    fn default() -> Self {
        Self {
            values: RefCell::new(None),
            busy: Cell::new(false),
            cyclic: Cell::new(false),
        }
    }
}

impl<T> Clone for DerivedCache<T> {
    // A clone starts cold.
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<T> DerivedCache<T> {
    /// Returns the values for an inner series of length `len`, computing
    /// them when missing or stale.
    pub(crate) fn get(&self, len: usize, compute: impl FnOnce() -> Vec<T>) -> Option<Rc<[T]>> {
        let hit = self
            .values
            .borrow()
            .as_ref()
            .filter(|(cached_len, _)| *cached_len == len)
            .map(|(_, values)| values.clone());
        if hit.is_some() {
            return hit;
        }
        if self.busy.replace(true) {
            if !self.cyclic.replace(true) {
                warn!("derived series reads itself while computing; it wraps itself");
            }
            return None;
        }
        let computed: Rc<[T]> = compute().into();
        self.busy.set(false);
        *self.values.borrow_mut() = Some((len, computed.clone()));
        Some(computed)
    }

    /// Whether a computation ever re-entered this cache.
    pub(crate) fn is_cyclic(&self) -> bool {
        self.cyclic.get()
    }
}

/// Fails when `cache` ever saw its series read itself.
pub(crate) fn check_acyclic<T>(cache: &DerivedCache<T>, kind: &str) -> Result<(), ChartError> {
    if cache.is_cyclic() {
        return Err(ChartError::invalid_series(format!("{kind} series wraps itself")));
    }
    Ok(())
}

/// The inner y values, with their x values.
pub(crate) fn collect_values(vs: &dyn crate::ValuesProvider) -> (Vec<f64>, Vec<f64>) {
    (0..vs.len()).map(|i| vs.values(i)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once_per_length() {
        let cache = DerivedCache::<f64>::default();
        let calls = Cell::new(0);
        let compute = |n: usize| {
            calls.set(calls.get() + 1);
            vec![1.0; n]
        };
        assert_eq!(cache.get(3, || compute(3)).map(|v| v.len()), Some(3));
        assert_eq!(cache.get(3, || compute(3)).map(|v| v.len()), Some(3));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.get(5, || compute(5)).map(|v| v.len()), Some(5));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn re_entry_is_reported() {
        let cache = DerivedCache::<f64>::default();
        let outer = cache.get(2, || {
            assert!(cache.get(2, Vec::new).is_none(), "inner read must not recurse");
            vec![0.0, 0.0]
        });
        assert!(outer.is_some());
        assert!(cache.is_cyclic());
    }
}
