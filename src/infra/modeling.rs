use std::{collections::BTreeMap, fmt};

use thiserror::Error;

use crate::{
    core::{ErrorKind, InsertPolicy},
    graph::{Edge, Graph, Vertex},
};

/// Number of distinct keys that operations pick from. Small enough for
/// operations to hit existing vertices often.
pub const KEY_SPACE: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Key(pub u8);

impl Key {
    pub fn name(&self) -> String {
        format!("v{}", self.0 % KEY_SPACE)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum MutOp<V, W> {
    AddVertex(Key, V, InsertPolicy),
    RemoveVertex(Key),
    RemoveAllVertices,
    AddEdge(Key, Key, W),
    RemoveEdge(Key, Key),
    RemoveAllEdges,
}

/// Outcome of a [`MutOp`], with errors reduced to their category so that the
/// results of a graph and a [`Model`] can be compared.
#[derive(Debug, Clone, PartialEq)]
pub enum MutOpResult<W> {
    AddVertex(Result<(), ErrorKind>),
    RemoveVertex(Result<(), ErrorKind>),
    RemoveAllVertices(Result<(), ErrorKind>),
    AddEdge(Result<(), ErrorKind>),
    RemoveEdge(Result<W, ErrorKind>),
    RemoveAllEdges(usize),
}

impl<V, W> MutOp<V, W> {
    pub fn apply(self, graph: &mut Graph<V, W>) -> MutOpResult<W> {
        match self {
            MutOp::AddVertex(key, data, policy) => {
                let result = match Vertex::new(data, &key.name()) {
                    Ok(vertex) => graph
                        .add_vertex(vertex, policy)
                        .map_err(|error| error.kind.category()),
                    Err(error) => Err(error.kind.category()),
                };
                MutOpResult::AddVertex(result)
            }
            MutOp::RemoveVertex(key) => MutOpResult::RemoveVertex(
                graph
                    .remove_vertex(&key.name())
                    .map_err(|error| error.category()),
            ),
            MutOp::RemoveAllVertices => MutOpResult::RemoveAllVertices(
                graph.remove_all_vertices().map_err(|error| error.category()),
            ),
            MutOp::AddEdge(src, dest, weight) => {
                let result = match Edge::between(&src.name(), &dest.name(), weight) {
                    Ok(edge) => graph.add_edge(edge).map_err(|error| error.kind.category()),
                    Err(error) => Err(error.category()),
                };
                MutOpResult::AddEdge(result)
            }
            MutOp::RemoveEdge(src, dest) => MutOpResult::RemoveEdge(
                graph
                    .remove_edge(&src.name(), &dest.name())
                    .map(Edge::into_weight)
                    .map_err(|error| error.category()),
            ),
            MutOp::RemoveAllEdges => MutOpResult::RemoveAllEdges(graph.remove_all_edges()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelMismatch {
    #[error("graph has {0} vertices, but model has {1}")]
    VertexCount(usize, usize),
    #[error("vertex `{0}` is missing in the graph")]
    MissingVertex(String),
    #[error("vertex `{0}` has data {1}, but model has {2}")]
    Data(String, String, String),
    #[error("vertex `{0}` has outgoing edges {1}, but model has {2}")]
    Edges(String, String, String),
}

/// Reference implementation of the graph semantics on top of ordered maps.
///
/// Outgoing edges are kept in insertion order, which the graph must match.
#[derive(Debug, Clone)]
pub struct Model<V, W> {
    vertices: BTreeMap<String, (V, Vec<(String, W)>)>,
}

impl<V, W> Model<V, W> {
    pub fn new() -> Self {
        Self {
            vertices: BTreeMap::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(|(_, edges)| edges.len()).sum()
    }

    pub fn apply(&mut self, op: MutOp<V, W>) -> MutOpResult<W> {
        match op {
            MutOp::AddVertex(key, data, policy) => {
                let key = key.name();
                let result = match self.vertices.get_mut(&key) {
                    Some(_) if !policy.overwrites() => Err(ErrorKind::Conflict),
                    Some(vertex) => {
                        // The new vertex starts without outgoing edges.
                        *vertex = (data, Vec::new());
                        Ok(())
                    }
                    None => {
                        self.vertices.insert(key, (data, Vec::new()));
                        Ok(())
                    }
                };
                MutOpResult::AddVertex(result)
            }
            MutOp::RemoveVertex(key) => {
                let key = key.name();
                let result = match self.vertices.remove(&key) {
                    Some(_) => {
                        for (_, edges) in self.vertices.values_mut() {
                            edges.retain(|(dest, _)| *dest != key);
                        }
                        Ok(())
                    }
                    None => Err(ErrorKind::NotFound),
                };
                MutOpResult::RemoveVertex(result)
            }
            MutOp::RemoveAllVertices => {
                self.vertices.clear();
                MutOpResult::RemoveAllVertices(Ok(()))
            }
            MutOp::AddEdge(src, dest, weight) => {
                let (src, dest) = (src.name(), dest.name());
                let result = if !self.vertices.contains_key(&dest) {
                    Err(ErrorKind::NotFound)
                } else {
                    match self.vertices.get_mut(&src) {
                        Some((_, edges)) if edges.iter().any(|(d, _)| *d == dest) => {
                            Err(ErrorKind::Conflict)
                        }
                        Some((_, edges)) => {
                            edges.push((dest, weight));
                            Ok(())
                        }
                        None => Err(ErrorKind::NotFound),
                    }
                };
                MutOpResult::AddEdge(result)
            }
            MutOp::RemoveEdge(src, dest) => {
                let (src, dest) = (src.name(), dest.name());
                let result = match self.vertices.get_mut(&src) {
                    Some((_, edges)) => match edges.iter().position(|(d, _)| *d == dest) {
                        Some(index) => Ok(edges.remove(index).1),
                        None => Err(ErrorKind::NotFound),
                    },
                    None => Err(ErrorKind::NotFound),
                };
                MutOpResult::RemoveEdge(result)
            }
            MutOp::RemoveAllEdges => {
                let removed = self.edge_count();
                for (_, edges) in self.vertices.values_mut() {
                    edges.clear();
                }
                MutOpResult::RemoveAllEdges(removed)
            }
        }
    }

    /// Compares vertices, their data and their outgoing edges with the graph.
    pub fn check(&self, graph: &Graph<V, W>) -> Result<(), ModelMismatch>
    where
        V: PartialEq + fmt::Debug,
        W: PartialEq + fmt::Debug,
    {
        if graph.vertex_count() != self.vertex_count() {
            return Err(ModelMismatch::VertexCount(
                graph.vertex_count(),
                self.vertex_count(),
            ));
        }

        for (key, (data, edges)) in self.vertices.iter() {
            let vertex = graph
                .get_vertex(key)
                .ok_or_else(|| ModelMismatch::MissingVertex(key.clone()))?;

            if vertex.data() != Some(data) {
                return Err(ModelMismatch::Data(
                    key.clone(),
                    format!("{:?}", vertex.data()),
                    format!("{:?}", data),
                ));
            }

            let actual = vertex
                .edges()
                .iter()
                .map(|edge| (edge.dest(), edge.weight()))
                .collect::<Vec<_>>();
            let expected = edges
                .iter()
                .map(|(dest, weight)| (dest.as_str(), weight))
                .collect::<Vec<_>>();

            if actual != expected {
                return Err(ModelMismatch::Edges(
                    key.clone(),
                    format!("{:?}", actual),
                    format!("{:?}", expected),
                ));
            }
        }

        Ok(())
    }
}

impl<V, W> Default for Model<V, W> {
    fn default() -> Self {
        Self::new()
    }
}
