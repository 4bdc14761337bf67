use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    rc::{Rc, Weak},
};

use crate::{
    core::error::{CreateVertexError, CreateVertexErrorKind, DestructorError},
    graph::Edge,
    storage::List,
};

pub(crate) type DataDtor<V> = dyn Fn(V) -> Result<(), DestructorError>;

/// State of a graph that its vertices refer back to.
pub(crate) struct Container<V> {
    data_dtor: Box<DataDtor<V>>,
}

impl<V> Container<V> {
    pub(crate) fn new(data_dtor: Box<DataDtor<V>>) -> Self {
        Self { data_dtor }
    }

    fn release(&self, data: V) -> Result<(), DestructorError> {
        (self.data_dtor)(data)
    }
}

/// Key of a vertex.
///
/// A vertex that is not part of any graph owns its key. Once added to a
/// graph, the vertex table holds the only copy and the vertex shares it.
#[derive(Debug, Clone)]
pub enum VertexKey {
    Owned(Box<str>),
    Stored(Rc<str>),
}

impl VertexKey {
    pub fn is_stored(&self) -> bool {
        matches!(self, VertexKey::Stored(_))
    }

    pub fn stored(&self) -> Option<&Rc<str>> {
        match self {
            VertexKey::Stored(key) => Some(key),
            VertexKey::Owned(_) => None,
        }
    }
}

impl Deref for VertexKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            VertexKey::Owned(key) => &**key,
            VertexKey::Stored(key) => &**key,
        }
    }
}

impl AsRef<str> for VertexKey {
    fn as_ref(&self) -> &str {
        self
    }
}

impl Borrow<str> for VertexKey {
    fn borrow(&self) -> &str {
        self
    }
}

impl PartialEq for VertexKey {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl Eq for VertexKey {}

impl PartialEq<str> for VertexKey {
    fn eq(&self, other: &str) -> bool {
        &**self == other
    }
}

impl Hash for VertexKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

/// Named vertex carrying user data and its outgoing edges.
///
/// When a vertex attached to a graph is destroyed, the graph's data destructor
/// is invoked on its data. A vertex that was never added to a graph just drops
/// its data.
pub struct Vertex<V, W = f64> {
    key: VertexKey,
    data: Option<V>,
    edges: List<Edge<W>>,
    container: Option<Weak<Container<V>>>,
}

impl<V, W> Vertex<V, W> {
    pub fn new(data: V, key: &str) -> Result<Self, CreateVertexError<V>> {
        Self::with_capacity(data, key, 0)
    }

    /// Creates a vertex with room for `edge_capacity` outgoing edges.
    pub fn with_capacity(
        data: V,
        key: &str,
        edge_capacity: usize,
    ) -> Result<Self, CreateVertexError<V>> {
        if key.is_empty() {
            return Err(CreateVertexError::new(data, CreateVertexErrorKind::EmptyKey));
        }

        let edges = match List::with_capacity(edge_capacity) {
            Ok(edges) => edges,
            Err(_) => {
                return Err(CreateVertexError::new(
                    data,
                    CreateVertexErrorKind::CapacityOverflow,
                ))
            }
        };

        Ok(Self {
            key: VertexKey::Owned(Box::from(key)),
            data: Some(data),
            edges,
            container: None,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_ref(&self) -> &VertexKey {
        &self.key
    }

    pub fn data(&self) -> Option<&V> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut V> {
        self.data.as_mut()
    }

    /// Outgoing edges in insertion order.
    pub fn edges(&self) -> &List<Edge<W>> {
        &self.edges
    }

    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }

    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    pub fn has_edge_to(&self, dest: &str) -> bool {
        self.edges.find_node(dest).is_some()
    }

    pub fn edge_to(&self, dest: &str) -> Option<&Edge<W>> {
        self.edges
            .find_node(dest)
            .and_then(|node| self.edges.get(node))
    }

    /// Destroys the vertex, reporting a failure of the data destructor.
    pub fn destroy(mut self) -> Result<(), DestructorError> {
        self.release_data()
    }

    pub(crate) fn edges_mut(&mut self) -> &mut List<Edge<W>> {
        &mut self.edges
    }

    pub(crate) fn edge_to_mut(&mut self, dest: &str) -> Option<&mut Edge<W>> {
        let node = self.edges.find_node(dest)?;
        self.edges.get_mut(node)
    }

    /// Key shared with edges pointing from or to this vertex.
    pub(crate) fn key_handle(&self) -> Rc<str> {
        match &self.key {
            VertexKey::Stored(key) => Rc::clone(key),
            VertexKey::Owned(key) => Rc::from(&**key),
        }
    }

    /// Gives up the private copy of the key in favor of the table's one and
    /// records the owning graph.
    pub(crate) fn attach(&mut self, stored: Rc<str>, container: Weak<Container<V>>) {
        debug_assert_eq!(&*stored, self.key());

        self.key = VertexKey::Stored(stored);
        self.container = Some(container);
    }

    fn release_data(&mut self) -> Result<(), DestructorError> {
        let Some(data) = self.data.take() else {
            return Ok(());
        };

        match self.container.as_ref().and_then(Weak::upgrade) {
            Some(container) => container.release(data),
            None => Ok(()),
        }
    }
}

impl<V, W> Drop for Vertex<V, W> {
    fn drop(&mut self) {
        if let Err(error) = self.release_data() {
            log::error!("destroying vertex `{}` failed: {}", self.key, error);
        }
    }
}

impl<V: fmt::Debug, W: fmt::Debug> fmt::Debug for Vertex<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vertex")
            .field("key", &self.key)
            .field("data", &self.data)
            .field("edges", &self.edges)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use assert_matches::assert_matches;

    fn counting_container(calls: Rc<Cell<usize>>) -> Rc<Container<i32>> {
        Rc::new(Container::new(Box::new(move |_: i32| {
            calls.set(calls.get() + 1);
            Ok(())
        })))
    }

    #[test]
    fn new_is_unattached() {
        let vertex = Vertex::<_, f64>::new(1, "a").unwrap();

        assert_eq!(vertex.key(), "a");
        assert!(!vertex.key_ref().is_stored());
        assert!(!vertex.is_attached());
        assert_eq!(vertex.data(), Some(&1));
        assert!(vertex.edges().is_empty());
    }

    #[test]
    fn empty_key() {
        let err = Vertex::<_, f64>::new(7, "").unwrap_err();

        assert_eq!(err.kind, CreateVertexErrorKind::EmptyKey);
        assert_eq!(err.data, 7);
    }

    #[test]
    fn with_capacity_overflow() {
        let err = Vertex::<_, f64>::with_capacity((), "a", usize::MAX).unwrap_err();
        assert_eq!(err.kind, CreateVertexErrorKind::CapacityOverflow);
    }

    #[test]
    fn unattached_destroy_skips_dtor() {
        let calls = Rc::new(Cell::new(0));
        let _container = counting_container(calls.clone());

        let vertex = Vertex::<_, f64>::new(1, "a").unwrap();
        vertex.destroy().unwrap();

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn attached_destroy_runs_dtor_once() {
        let calls = Rc::new(Cell::new(0));
        let container = counting_container(calls.clone());

        let mut vertex = Vertex::<_, f64>::new(1, "a").unwrap();
        let stored: Rc<str> = Rc::from("a");
        vertex.attach(stored.clone(), Rc::downgrade(&container));

        assert!(vertex.is_attached());
        assert!(Rc::ptr_eq(vertex.key_ref().stored().unwrap(), &stored));

        vertex.destroy().unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn drop_runs_dtor() {
        let calls = Rc::new(Cell::new(0));
        let container = counting_container(calls.clone());

        {
            let mut vertex = Vertex::<_, f64>::new(1, "a").unwrap();
            vertex.attach(Rc::from("a"), Rc::downgrade(&container));
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failing_dtor_is_reported() {
        let container: Rc<Container<i32>> = Rc::new(Container::new(Box::new(|data: i32| {
            Err(DestructorError::new(format!("{data} is busy")))
        })));

        let mut vertex = Vertex::<_, f64>::new(1, "a").unwrap();
        vertex.attach(Rc::from("a"), Rc::downgrade(&container));

        assert_matches!(vertex.destroy(), Err(DestructorError(reason)) if reason == "1 is busy");
    }

    #[test]
    fn key_handle_shares_stored_key() {
        let container = counting_container(Rc::new(Cell::new(0)));
        let mut vertex = Vertex::<_, f64>::new(1, "a").unwrap();

        let owned = vertex.key_handle();
        assert_eq!(&*owned, "a");

        let stored: Rc<str> = Rc::from("a");
        vertex.attach(stored.clone(), Rc::downgrade(&container));
        assert!(Rc::ptr_eq(&vertex.key_handle(), &stored));
    }

    #[test]
    fn key_comparisons() {
        let owned = VertexKey::Owned(Box::from("a"));
        let stored = VertexKey::Stored(Rc::from("a"));

        assert_eq!(owned, stored);
        assert_eq!(&*owned, "a");
        assert_eq!(stored.to_string(), "a");
    }
}
