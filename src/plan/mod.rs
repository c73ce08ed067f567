//! Video segment planning and filter-graph composition.
//!
//! Planning covers the timeline `[0, end]` with real and synthesized
//! spans; composition turns that plan into a renderer-agnostic graph
//! description. Neither touches sample or pixel data.

/// Ordered stream relabeling + concatenation graph for a render engine.
pub mod filtergraph;
/// Gap-aware temporal segmentation with stacking precedence.
pub mod segment;
