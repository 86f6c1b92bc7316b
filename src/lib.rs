/// xID Registry - name ownership, fee burning and peer content roots
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `xid-core`: Registry state machine, record store, fee engine and
///   content-root engine

/// This module is intentionally empty as the actual implementation
/// is in the subcrates.
/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
