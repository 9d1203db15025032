use std::collections::HashSet;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::{error, trace};

lazy_static! {
    /// Stores the set of unique invariant keys (descriptions) that have been successfully asserted.
    static ref CHECKED_INVARIANTS: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

pub const RELEASE_HAS_EXECUTABLE: &str = "Release directory contains the executable";
pub const WORK_DIR_REMOVED: &str = "Packager work directory is gone after cleanup";
pub const METADATA_REMOVED: &str = "Packager metadata file is gone after cleanup";

/// Asserts that a pipeline invariant holds true.
///
/// If the condition is false, this will panic (in debug/test) or log a critical error (in prod).
/// If true, it records that this invariant was explicitly checked, allowing for "Contract Tests".
///
/// # Arguments
/// * `condition` - The boolean result of the check.
/// * `description` - A human-readable description of the invariant.
/// * `component` - Optional stage tag (e.g., "Assembler", "Cleanup").
pub fn assert_invariant(condition: bool, description: &str, component: Option<&str>) {
    if !condition {
        let msg = format!(
            "CRITICAL INVARIANT VIOLATION [{}]: {}",
            component.unwrap_or("Pipeline"),
            description
        );
        error!("{}", msg);

        if cfg!(debug_assertions) || cfg!(test) {
            panic!("{}", msg);
        }
    } else {
        trace!("Invariant held: {}", description);
        let mut set = CHECKED_INVARIANTS.lock().unwrap_or_else(|e| e.into_inner());
        set.insert(description.to_string());
    }
}

/// A "Contract Test" verifies that specific invariants were actually checked during execution.
///
/// # Arguments
/// * `context` - Name of the test context.
/// * `required_invariants` - List of description strings that MUST have been asserted.
#[cfg(test)]
pub fn contract_test(context: &str, required_invariants: &[&str]) {
    // Guard must be dropped before panicking.
    let missing: Vec<&str> = {
        let checked = CHECKED_INVARIANTS.lock().unwrap_or_else(|e| e.into_inner());
        required_invariants
            .iter()
            .copied()
            .filter(|req| !checked.contains(*req))
            .collect()
    };

    if !missing.is_empty() {
        panic!(
            "Contract Test Failed for '{}'. The following invariants were NOT checked:\n{:#?}",
            context, missing
        );
    }
}
