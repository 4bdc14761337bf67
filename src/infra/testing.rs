use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    core::{error::DestructorError, InsertPolicy},
    graph::{Edge, Graph, Vertex},
};

pub fn vertex_key(index: usize) -> String {
    format!("v{index}")
}

pub fn create_complete<V, W>(vertex_count: usize) -> Graph<V, W>
where
    V: Default,
    W: Default,
{
    let mut graph = Graph::default();

    for i in 0..vertex_count {
        add_default_vertex(&mut graph, i);
    }

    for i in 0..vertex_count {
        for j in 0..vertex_count {
            if i != j {
                add_default_edge(&mut graph, i, j);
            }
        }
    }

    graph
}

pub fn create_path<V, W>(vertex_count: usize) -> Graph<V, W>
where
    V: Default,
    W: Default,
{
    let mut graph = Graph::default();

    for i in 0..vertex_count {
        add_default_vertex(&mut graph, i);

        if i > 0 {
            add_default_edge(&mut graph, i - 1, i);
        }
    }

    graph
}

fn add_default_vertex<V: Default, W>(graph: &mut Graph<V, W>, index: usize) {
    if let Ok(vertex) = Vertex::new(V::default(), &vertex_key(index)) {
        let added = graph.add_vertex(vertex, InsertPolicy::Reject);
        debug_assert!(added.is_ok());
    }
}

fn add_default_edge<V, W: Default>(graph: &mut Graph<V, W>, src: usize, dest: usize) {
    if let Ok(edge) = Edge::between(&vertex_key(src), &vertex_key(dest), W::default()) {
        let added = graph.add_edge(edge);
        debug_assert!(added.is_ok());
    }
}

/// Data destructor that records every call.
#[derive(Debug)]
pub struct DropCounter<V> {
    calls: Rc<Cell<usize>>,
    released: Rc<RefCell<Vec<V>>>,
}

impl<V: 'static> DropCounter<V> {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(Cell::new(0)),
            released: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Number of destructor calls, including failed ones.
    pub fn count(&self) -> usize {
        self.calls.get()
    }

    /// Data successfully released so far, in release order.
    pub fn released(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.released.borrow().clone()
    }

    pub fn dtor(&self) -> impl Fn(V) -> Result<(), DestructorError> + 'static {
        self.failing_dtor(|_| false)
    }

    /// Destructor that refuses data for which `fail` returns true.
    pub fn failing_dtor<F>(&self, fail: F) -> impl Fn(V) -> Result<(), DestructorError> + 'static
    where
        F: Fn(&V) -> bool + 'static,
    {
        let calls = Rc::clone(&self.calls);
        let released = Rc::clone(&self.released);

        move |data| {
            calls.set(calls.get() + 1);

            if fail(&data) {
                return Err(DestructorError::new("refused by test destructor"));
            }

            released.borrow_mut().push(data);
            Ok(())
        }
    }
}

impl<V: 'static> Default for DropCounter<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyCheckError {
    #[error("graph size ({0}) is not equal to table entry count ({1})")]
    SizeMismatch(usize, usize),
    #[error("live slot count ({0}) is not equal to table entry count ({1})")]
    LiveSlotMismatch(usize, usize),
    #[error("tombstoned slot count ({0}) is not equal to recorded tombstones ({1})")]
    TombstoneMismatch(usize, usize),
    #[error("vertices iterator count ({0}) is not equal to graph size ({1})")]
    VerticesSizeMismatch(usize, usize),
    #[error("vertex `{0}` is not attached to the graph")]
    Detached(String),
    #[error("vertex `{0}` does not share its key with the table")]
    KeyNotShared(String),
    #[error("vertex `{0}` is stored under key `{1}`")]
    KeyMismatch(String, String),
    #[error("edge in the list of `{0}` has source `{1}`")]
    WrongSource(String, String),
    #[error("edge `{0}` -> `{1}` points to a missing vertex")]
    DanglingEdge(String, String),
    #[error("edge `{0}` -> `{1}` does not share keys with the table")]
    EdgeKeyNotShared(String, String),
    #[error("vertex `{0}` has more than one edge to `{1}`")]
    MultiEdge(String, String),
    #[error("edge list of `{0}` has {1} nodes when walked {2}, but length {3}")]
    ListLength(String, usize, &'static str, usize),
}

pub fn check_consistency<V, W>(graph: &Graph<V, W>) -> Result<(), ConsistencyCheckError> {
    fn cmp<F, E>(actual: usize, expected: usize, error: F) -> Result<(), E>
    where
        F: FnOnce(usize, usize) -> E,
    {
        if actual == expected {
            Ok(())
        } else {
            Err(error(actual, expected))
        }
    }

    let table = graph.table();

    cmp(graph.size(), table.len(), ConsistencyCheckError::SizeMismatch)?;
    cmp(
        table.slots().iter().filter(|slot| slot.is_live()).count(),
        table.len(),
        ConsistencyCheckError::LiveSlotMismatch,
    )?;
    cmp(
        table.slots().iter().filter(|slot| slot.is_tombstone()).count(),
        table.tombstones(),
        ConsistencyCheckError::TombstoneMismatch,
    )?;
    cmp(
        graph.vertices().count(),
        graph.size(),
        ConsistencyCheckError::VerticesSizeMismatch,
    )?;

    for entry in table.slots().iter().filter_map(|slot| slot.entry()) {
        let key = &entry.key;
        let vertex = &entry.item;

        if vertex.key() != &**key {
            return Err(ConsistencyCheckError::KeyMismatch(
                vertex.key().to_owned(),
                key.to_string(),
            ));
        }

        if !vertex.is_attached() {
            return Err(ConsistencyCheckError::Detached(key.to_string()));
        }

        match vertex.key_ref().stored() {
            Some(stored) if Rc::ptr_eq(stored, key) => {}
            _ => return Err(ConsistencyCheckError::KeyNotShared(key.to_string())),
        }

        let mut dests = FxHashSet::default();

        for edge in vertex.edges() {
            let src = edge.src().to_owned();
            let dest = edge.dest().to_owned();

            if edge.src() != &**key {
                return Err(ConsistencyCheckError::WrongSource(key.to_string(), src));
            }

            let stored_dest = match table.stored_key(edge.dest()) {
                Some(stored_dest) => stored_dest,
                None => return Err(ConsistencyCheckError::DanglingEdge(src, dest)),
            };

            if !Rc::ptr_eq(edge.src_key(), key) || !Rc::ptr_eq(edge.dest_key(), stored_dest) {
                return Err(ConsistencyCheckError::EdgeKeyNotShared(src, dest));
            }

            if !dests.insert(edge.dest()) {
                return Err(ConsistencyCheckError::MultiEdge(src, dest));
            }
        }

        let len = vertex.edges().len();
        let walked = |direction| {
            move |actual, expected| {
                ConsistencyCheckError::ListLength(key.to_string(), actual, direction, expected)
            }
        };

        let mut forward = 0;
        let mut node = vertex.edges().head();
        while let Some(id) = node {
            forward += 1;
            node = vertex.edges().next(id);
        }

        let mut backward = 0;
        let mut node = vertex.edges().tail();
        while let Some(id) = node {
            backward += 1;
            node = vertex.edges().prev(id);
        }

        cmp(forward, len, walked("forward"))?;
        cmp(backward, len, walked("backward"))?;
    }

    Ok(())
}
