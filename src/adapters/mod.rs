// Adapters layer: concrete implementations of the domain ports. Only the
// in-process variants live here; a persistent backend would slot in behind
// the same traits.

pub mod memory;
