//! Vertices, edges and the graph that owns them.
//!
//! Ownership flows one way: a [`Graph`] owns its [`Vertex`]es through the
//! vertex table, a vertex owns its outgoing [`Edge`]s through its adjacency
//! list, and edges refer to their endpoints by key only. The link from a
//! vertex back to its graph is weak.

mod edge;
mod keyed;
mod vertex;

pub use edge::Edge;
pub use keyed::Graph;
pub use vertex::{Vertex, VertexKey};
