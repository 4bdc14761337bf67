use std::fmt;

use thiserror::Error;

use crate::graph::{Edge, Vertex};

/// Coarse classification shared by all errors of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    AllocationError,
    NotFound,
    Conflict,
    DestructorFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::AllocationError => "allocation failed",
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::DestructorFailed => "destructor failed",
        };
        f.write_str(reason)
    }
}

/// Failure reported by a vertex data destructor.
#[derive(Debug, Clone, Error, PartialEq, Eq, Hash)]
#[error("destructor failed: {0}")]
pub struct DestructorError(pub String);

impl DestructorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("key must not be empty")]
pub struct EmptyKeyError;

impl EmptyKeyError {
    pub fn category(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateVertexErrorKind {
    EmptyKey,
    CapacityOverflow,
}

impl CreateVertexErrorKind {
    pub fn category(&self) -> ErrorKind {
        match self {
            CreateVertexErrorKind::EmptyKey => ErrorKind::InvalidArgument,
            CreateVertexErrorKind::CapacityOverflow => ErrorKind::AllocationError,
        }
    }
}

impl fmt::Display for CreateVertexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            CreateVertexErrorKind::EmptyKey => "the key is empty",
            CreateVertexErrorKind::CapacityOverflow => "the edge list could not be allocated",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("creating vertex failed: {kind}")]
pub struct CreateVertexError<V> {
    pub data: V,
    pub kind: CreateVertexErrorKind,
}

impl<V> CreateVertexError<V> {
    pub fn new(data: V, kind: CreateVertexErrorKind) -> Self {
        Self { data, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddVertexErrorKind {
    DuplicateKey,
    CapacityOverflow,
    /// The vertex was added, but the one it replaced failed to release its
    /// data.
    Destructor(DestructorError),
}

impl AddVertexErrorKind {
    pub fn category(&self) -> ErrorKind {
        match self {
            AddVertexErrorKind::DuplicateKey => ErrorKind::Conflict,
            AddVertexErrorKind::CapacityOverflow => ErrorKind::AllocationError,
            AddVertexErrorKind::Destructor(_) => ErrorKind::DestructorFailed,
        }
    }
}

impl fmt::Display for AddVertexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddVertexErrorKind::DuplicateKey => {
                f.write_str("a vertex with the same key already exists")
            }
            AddVertexErrorKind::CapacityOverflow => {
                f.write_str("the graph has exhausted its capacity")
            }
            AddVertexErrorKind::Destructor(error) => {
                write!(f, "the replaced vertex was not released ({error})")
            }
        }
    }
}

/// Returned when a vertex could not be added. The vertex is handed back
/// untouched, still unattached and owning its key. Only when the vertex was
/// added and destroying the replaced one failed, there is nothing to hand
/// back.
#[derive(Debug, Error)]
#[error("adding vertex failed: {kind}")]
pub struct AddVertexError<V, W> {
    pub vertex: Option<Vertex<V, W>>,
    pub kind: AddVertexErrorKind,
}

impl<V, W> AddVertexError<V, W> {
    pub fn new(vertex: Vertex<V, W>, kind: AddVertexErrorKind) -> Self {
        Self {
            vertex: Some(vertex),
            kind,
        }
    }

    pub fn displaced(error: DestructorError) -> Self {
        Self {
            vertex: None,
            kind: AddVertexErrorKind::Destructor(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddEdgeErrorKind {
    SourceAbsent,
    DestinationAbsent,
    MultiEdge,
    CapacityOverflow,
}

impl AddEdgeErrorKind {
    pub fn category(&self) -> ErrorKind {
        match self {
            AddEdgeErrorKind::SourceAbsent | AddEdgeErrorKind::DestinationAbsent => {
                ErrorKind::NotFound
            }
            AddEdgeErrorKind::MultiEdge => ErrorKind::Conflict,
            AddEdgeErrorKind::CapacityOverflow => ErrorKind::AllocationError,
        }
    }
}

impl fmt::Display for AddEdgeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AddEdgeErrorKind::SourceAbsent => "source does not exist",
            AddEdgeErrorKind::DestinationAbsent => "destination does not exist",
            AddEdgeErrorKind::MultiEdge => "an edge to the same destination already exists",
            AddEdgeErrorKind::CapacityOverflow => "the edge list has exhausted its capacity",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("adding edge failed: {kind}")]
pub struct AddEdgeError<W> {
    pub edge: Edge<W>,
    pub kind: AddEdgeErrorKind,
}

impl<W> AddEdgeError<W> {
    pub fn new(edge: Edge<W>, kind: AddEdgeErrorKind) -> Self {
        Self { edge, kind }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("key must not be empty")]
    InvalidKey,
    #[error("vertex `{0}` does not exist")]
    VertexAbsent(String),
    #[error("edge `{0}` -> `{1}` does not exist")]
    EdgeAbsent(String, String),
    #[error("{0}")]
    Destructor(#[from] DestructorError),
}

impl GraphError {
    pub fn category(&self) -> ErrorKind {
        match self {
            GraphError::InvalidKey => ErrorKind::InvalidArgument,
            GraphError::VertexAbsent(_) | GraphError::EdgeAbsent(_, _) => ErrorKind::NotFound,
            GraphError::Destructor(_) => ErrorKind::DestructorFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("node does not exist")]
    StaleNode,
    #[error("the list has exhausted its capacity")]
    CapacityOverflow,
}

impl ListError {
    pub fn category(&self) -> ErrorKind {
        match self {
            ListError::StaleNode => ErrorKind::NotFound,
            ListError::CapacityOverflow => ErrorKind::AllocationError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertErrorKind {
    DuplicateKey,
    CapacityOverflow,
}

impl fmt::Display for InsertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            InsertErrorKind::DuplicateKey => "the key is already present",
            InsertErrorKind::CapacityOverflow => "the table has exhausted its capacity",
        };
        f.write_str(reason)
    }
}

/// Returned by the hash table when an item could not be inserted. Carries
/// the item back to the caller.
#[derive(Debug, Error, PartialEq)]
#[error("inserting into table failed: {kind}")]
pub struct InsertError<T> {
    pub item: T,
    pub kind: InsertErrorKind,
}

impl<T> InsertError<T> {
    pub fn new(item: T, kind: InsertErrorKind) -> Self {
        Self { item, kind }
    }
}

impl From<InsertErrorKind> for AddVertexErrorKind {
    fn from(kind: InsertErrorKind) -> Self {
        match kind {
            InsertErrorKind::DuplicateKey => AddVertexErrorKind::DuplicateKey,
            InsertErrorKind::CapacityOverflow => AddVertexErrorKind::CapacityOverflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            AddEdgeErrorKind::DestinationAbsent.category(),
            ErrorKind::NotFound
        );
        assert_eq!(AddEdgeErrorKind::MultiEdge.category(), ErrorKind::Conflict);
        assert_eq!(
            AddVertexErrorKind::CapacityOverflow.category(),
            ErrorKind::AllocationError
        );
        assert_eq!(GraphError::InvalidKey.category(), ErrorKind::InvalidArgument);
        assert_eq!(
            GraphError::EdgeAbsent("a".into(), "b".into()).category(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn displaced_destructor() {
        let error = AddVertexError::<(), f64>::displaced(DestructorError::new("busy"));

        assert!(error.vertex.is_none());
        assert_eq!(error.kind.category(), ErrorKind::DestructorFailed);
        assert_eq!(
            error.to_string(),
            "adding vertex failed: the replaced vertex was not released (destructor failed: busy)"
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            GraphError::VertexAbsent("a".into()).to_string(),
            "vertex `a` does not exist"
        );
        assert_eq!(
            GraphError::from(DestructorError::new("busy")).to_string(),
            "destructor failed: busy"
        );
    }
}
