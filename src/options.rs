use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings for one decode call (or one `Resolver`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Compare names case-insensitively when looking symbols up.
    pub ignore_case: bool,
    /// Maximum nesting of keys inside keys before the key is rejected.
    pub max_depth: usize,
    #[serde(skip)]
    pub cancellation: Option<CancellationFlag>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            max_depth: DEFAULT_MAX_DEPTH,
            cancellation: None,
        }
    }
}

impl ResolveOptions {
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|c| c.is_cancelled())
            .unwrap_or_default()
    }

    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if self.ignore_case {
            a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }
}

/// Shared flag a caller can set to abandon in-flight decodes.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_sensitivity_follows_option() {
        let exact = ResolveOptions::default();
        assert!(!exact.names_match("Point", "point"));

        let loose = ResolveOptions::default().ignore_case(true);
        assert!(loose.names_match("Point", "point"));
        assert!(!loose.names_match("Point", "Points"));
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let options = ResolveOptions::default().cancellation(flag.clone());
        assert!(!options.is_cancelled());
        flag.cancel();
        assert!(options.is_cancelled());
    }

    #[test]
    fn serializes_without_cancellation() {
        let options: ResolveOptions = bincode::deserialize(
            &bincode::serialize(&ResolveOptions::default().ignore_case(true)).unwrap(),
        )
        .unwrap();
        assert!(options.ignore_case);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.cancellation.is_none());
    }
}
