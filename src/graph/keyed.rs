use std::{fmt, rc::Rc};

use crate::{
    core::{
        error::{
            AddEdgeError, AddEdgeErrorKind, AddVertexError, DestructorError, GraphError,
        },
        InsertPolicy, TableConfig,
    },
    graph::{vertex::Container, Edge, Vertex},
    storage::{HashTable, List},
};

/// Directed, weighted graph whose vertices are identified by unique string
/// keys.
///
/// The graph owns its vertices, and each vertex owns its outgoing edges.
/// Destroying the graph destroys every vertex, which runs the data destructor
/// given at construction on each vertex's data.
///
/// Between any two vertices there is at most one edge in each direction.
pub struct Graph<V, W = f64> {
    vertices: HashTable<Vertex<V, W>>,
    container: Rc<Container<V>>,
    size: usize,
}

impl<V, W> Graph<V, W> {
    pub fn new<F>(data_dtor: F) -> Self
    where
        F: Fn(V) -> Result<(), DestructorError> + 'static,
    {
        Self::with_config(data_dtor, TableConfig::default())
    }

    pub fn with_config<F>(data_dtor: F, config: TableConfig) -> Self
    where
        F: Fn(V) -> Result<(), DestructorError> + 'static,
    {
        Self {
            vertices: HashTable::with_config(config),
            container: Rc::new(Container::new(Box::new(data_dtor))),
            size: 0,
        }
    }

    /// Destroys all vertices and the graph itself. Unlike dropping the graph,
    /// this reports the first failure of the data destructor.
    pub fn destroy(mut self) -> Result<(), GraphError> {
        self.remove_all_vertices()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn vertex_count(&self) -> usize {
        self.size
    }

    pub fn edge_count(&self) -> usize {
        self.vertices
            .iter()
            .map(|(_, vertex)| vertex.out_degree())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Adds the vertex under its key.
    ///
    /// Under [`InsertPolicy::Overwrite`], a vertex with the same key is
    /// destroyed and replaced. If its data destructor fails, the returned
    /// error carries no vertex, since the new one has already been added.
    pub fn add_vertex(
        &mut self,
        vertex: Vertex<V, W>,
        policy: InsertPolicy,
    ) -> Result<(), AddVertexError<V, W>> {
        // The table keeps its own copy of the key. If the insertion fails,
        // this copy is dropped and the vertex is returned as it was.
        let staged: Rc<str> = Rc::from(vertex.key());

        let inserted = self
            .vertices
            .insert(staged, vertex, policy)
            .map_err(|error| AddVertexError::new(error.item, error.kind.into()))?;

        let container = Rc::downgrade(&self.container);
        if let Some((stored, vertex)) = self.vertices.entry_at_mut(inserted.slot) {
            vertex.attach(Rc::clone(stored), container);
            log::trace!("added vertex `{}`", stored);
        }

        match inserted.displaced {
            // The new vertex stays in place even if the old one fails to
            // release its data.
            Some(displaced) => displaced.destroy().map_err(AddVertexError::displaced),
            None => {
                self.size += 1;
                Ok(())
            }
        }
    }

    pub fn has_vertex(&self, key: &str) -> bool {
        self.vertices.contains_key(key)
    }

    pub fn get_vertex(&self, key: &str) -> Option<&Vertex<V, W>> {
        self.vertices.search(key)
    }

    /// Mutable access to the data of a vertex. The vertex itself stays
    /// owned by the graph.
    pub fn get_vertex_data_mut(&mut self, key: &str) -> Option<&mut V> {
        self.vertices.search_mut(key)?.data_mut()
    }

    /// Removes the vertex together with its outgoing edges and all edges
    /// pointing to it from other vertices.
    pub fn remove_vertex(&mut self, key: &str) -> Result<(), GraphError> {
        if key.is_empty() {
            return Err(GraphError::InvalidKey);
        }

        if !self.vertices.contains_key(key) {
            return Err(GraphError::VertexAbsent(key.to_owned()));
        }

        let mut purged = 0;
        for (_, vertex) in self.vertices.iter_mut() {
            if let Some(node) = vertex.edges().find_node(key) {
                if vertex.edges_mut().remove(node).is_ok() {
                    purged += 1;
                }
            }
        }

        let (_, vertex) = self
            .vertices
            .delete(key)
            .ok_or_else(|| GraphError::VertexAbsent(key.to_owned()))?;
        self.size -= 1;

        log::trace!("removed vertex `{}` and {} incoming edges", key, purged);

        vertex.destroy()?;
        Ok(())
    }

    /// Destroys every vertex. Stops at the first failure of the data
    /// destructor; the vertex whose destructor failed is removed nevertheless.
    pub fn remove_all_vertices(&mut self) -> Result<(), GraphError> {
        let count = self.size;

        for slot in 0..self.vertices.capacity() {
            if let Some((_, vertex)) = self.vertices.take_at(slot) {
                self.size -= 1;
                vertex.destroy()?;
            }
        }

        debug_assert_eq!(self.size, 0);
        log::debug!("removed all {} vertices", count);

        Ok(())
    }

    pub fn add_edge(&mut self, mut edge: Edge<W>) -> Result<(), AddEdgeError<W>> {
        if !self.vertices.contains_key(edge.src()) {
            return Err(AddEdgeError::new(edge, AddEdgeErrorKind::SourceAbsent));
        }

        let dest = match self.vertices.stored_key(edge.dest()) {
            Some(dest) => Rc::clone(dest),
            None => return Err(AddEdgeError::new(edge, AddEdgeErrorKind::DestinationAbsent)),
        };

        let vertex = match self.vertices.search_mut(edge.src()) {
            Some(vertex) => vertex,
            None => return Err(AddEdgeError::new(edge, AddEdgeErrorKind::SourceAbsent)),
        };

        if vertex.has_edge_to(&dest) {
            return Err(AddEdgeError::new(edge, AddEdgeErrorKind::MultiEdge));
        }

        edge.rebind(vertex.key_handle(), dest);
        log::trace!("adding edge `{}` -> `{}`", edge.src(), edge.dest());

        vertex
            .edges_mut()
            .push_back(edge)
            .map(|_| ())
            .map_err(|error| AddEdgeError::new(error.item, AddEdgeErrorKind::CapacityOverflow))
    }

    pub fn has_edge(&self, src: &str, dest: &str) -> bool {
        self.get_edge(src, dest).is_some()
    }

    pub fn get_edge(&self, src: &str, dest: &str) -> Option<&Edge<W>> {
        if !self.vertices.contains_key(dest) {
            return None;
        }

        self.vertices.search(src)?.edge_to(dest)
    }

    /// Mutable access to the weight of an edge. Its endpoints cannot be
    /// changed.
    pub fn get_edge_weight_mut(&mut self, src: &str, dest: &str) -> Option<&mut W> {
        if !self.vertices.contains_key(dest) {
            return None;
        }

        self.vertices
            .search_mut(src)?
            .edge_to_mut(dest)
            .map(Edge::weight_mut)
    }

    /// Outgoing edges of the vertex. The list stays owned by the vertex.
    pub fn get_all_edges_of(&self, key: &str) -> Option<&List<Edge<W>>> {
        self.vertices.search(key).map(Vertex::edges)
    }

    pub fn remove_edge(&mut self, src: &str, dest: &str) -> Result<Edge<W>, GraphError> {
        if src.is_empty() || dest.is_empty() {
            return Err(GraphError::InvalidKey);
        }

        let absent = || GraphError::EdgeAbsent(src.to_owned(), dest.to_owned());

        if !self.vertices.contains_key(dest) {
            return Err(absent());
        }

        let vertex = self.vertices.search_mut(src).ok_or_else(absent)?;
        let node = vertex.edges().find_node(dest).ok_or_else(absent)?;
        let edge = vertex.edges_mut().remove(node).map_err(|_| absent())?;

        log::trace!("removed edge `{}` -> `{}`", src, dest);

        Ok(edge)
    }

    /// Removes the edges of every vertex. Returns the number of removed edges.
    pub fn remove_all_edges(&mut self) -> usize {
        let removed = self
            .vertices
            .iter_mut()
            .map(|(_, vertex)| vertex.edges_mut().clear())
            .sum();

        log::debug!("removed all {} edges", removed);
        removed
    }

    /// Live vertices in table order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<V, W>> + '_ {
        self.vertices.iter().map(|(_, vertex)| vertex)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.vertices.keys()
    }

    /// All edges, grouped by their source vertex.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<W>> + '_ {
        self.vertices().flat_map(|vertex| vertex.edges().iter())
    }

    pub(crate) fn table(&self) -> &HashTable<Vertex<V, W>> {
        &self.vertices
    }
}

impl<V, W> Default for Graph<V, W> {
    /// Graph whose data destructor just drops the data.
    fn default() -> Self {
        Self::new(|data| {
            drop(data);
            Ok(())
        })
    }
}

impl<V, W> Drop for Graph<V, W> {
    fn drop(&mut self) {
        // Each failed attempt still removes the offending vertex.
        while let Err(error) = self.remove_all_vertices() {
            log::error!("destroying graph: {}", error);
        }
    }
}

impl<V: fmt::Debug, W: fmt::Debug> fmt::Debug for Graph<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.vertices.iter()).finish()
    }
}
