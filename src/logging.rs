/*!
Log targets used by the library.

No logger is installed here; the `satbridge` binary wires up `env_logger`,
so e.g. `RUST_LOG=checker=trace` shows every trail update.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Variable to literal allocations.
    pub const REGISTRY: &str = "registry";

    /// Clauses produced by the gate encoder.
    pub const ENCODER: &str = "encoder";

    /// Bound-literal trail and incremental checks.
    pub const CHECKER: &str = "checker";

    /// Post / initial propagation of the bridge.
    pub const LIFECYCLE: &str = "lifecycle";

    /// Reference host search.
    pub const SEARCH: &str = "search";

    /// Satisfiability engine backends.
    pub const ENGINE: &str = "engine";
}
