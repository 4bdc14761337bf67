//! Directed, weighted graph whose vertices are identified by string keys.
//!
//! ```
//! use keygraph::prelude::*;
//!
//! let mut graph = Graph::<u32>::default();
//!
//! for (data, key) in ["a", "b", "c"].into_iter().enumerate() {
//!     let vertex = Vertex::new(data as u32, key).unwrap();
//!     graph.add_vertex(vertex, InsertPolicy::Reject).unwrap();
//! }
//!
//! graph.add_edge(Edge::between("a", "b", 1.0).unwrap()).unwrap();
//! graph.add_edge(Edge::between("a", "c", 2.0).unwrap()).unwrap();
//!
//! assert_eq!(graph.get_edge("a", "c").map(Edge::weight), Some(&2.0));
//!
//! // Removing a vertex removes the edges pointing to it as well.
//! graph.remove_vertex("b").unwrap();
//! assert!(!graph.has_edge("a", "b"));
//! assert_eq!(graph.size(), 2);
//! ```

pub mod core;
pub mod graph;
pub mod infra;
pub mod storage;

pub mod prelude {
    pub use crate::{
        core::{
            error::{DestructorError, GraphError},
            InsertPolicy, TableConfig,
        },
        graph::{Edge, Graph, Vertex},
    };
}
