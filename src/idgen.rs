use crate::graph::normalize::sanitize_id;

/// Deterministic generator for compiler-synthesized node and edge ids.
///
/// Synthesized ids are derived from a role name and a monotonic counter
/// rather than wall-clock time, so compiling the same graph twice yields
/// byte-identical output.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// A generator whose ids carry a fixed prefix, e.g. `repair_edge_1`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: sanitize_id(prefix),
            counter: 0,
        }
    }

    /// The next id for the given role, e.g. `end_call_3`.
    pub fn next(&mut self, role: &str) -> String {
        self.counter += 1;
        let role = sanitize_id(role);
        if self.prefix.is_empty() {
            format!("{}_{}", role, self.counter)
        } else {
            format!("{}_{}_{}", self.prefix, role, self.counter)
        }
    }

    /// The next id for the role that is not already taken according to
    /// `in_use`. Keeps generated ids from colliding with authored ones.
    pub fn next_unused(&mut self, role: &str, in_use: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.next(role);
            if !in_use(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
