use std::rc::Rc;

use crate::{
    core::error::EmptyKeyError,
    graph::Vertex,
    storage::Matches,
};

/// Directed, weighted connection between two vertices, identified by their
/// keys. An edge never owns its endpoints.
///
/// Creating an edge does not check that the endpoints exist anywhere, this is
/// done when the edge is added to a graph. From then on the endpoint keys are
/// shared with the graph's vertex table.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<W = f64> {
    src: Rc<str>,
    dest: Rc<str>,
    weight: W,
}

impl<W> Edge<W> {
    pub fn new<V>(src: &Vertex<V, W>, dest: &Vertex<V, W>, weight: W) -> Self {
        Self {
            src: src.key_handle(),
            dest: dest.key_handle(),
            weight,
        }
    }

    pub fn between(src: &str, dest: &str, weight: W) -> Result<Self, EmptyKeyError> {
        if src.is_empty() || dest.is_empty() {
            return Err(EmptyKeyError);
        }

        Ok(Self {
            src: Rc::from(src),
            dest: Rc::from(dest),
            weight,
        })
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    pub fn weight_mut(&mut self) -> &mut W {
        &mut self.weight
    }

    pub fn into_weight(self) -> W {
        self.weight
    }

    pub(crate) fn src_key(&self) -> &Rc<str> {
        &self.src
    }

    pub(crate) fn dest_key(&self) -> &Rc<str> {
        &self.dest
    }

    /// Points the endpoints at the graph's stored keys.
    pub(crate) fn rebind(&mut self, src: Rc<str>, dest: Rc<str>) {
        debug_assert_eq!(self.src, src);
        debug_assert_eq!(self.dest, dest);

        self.src = src;
        self.dest = dest;
    }
}

impl<W> Matches<str> for Edge<W> {
    fn matches(&self, key: &str) -> bool {
        &*self.dest == key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    #[test]
    fn new_captures_keys() {
        let a = Vertex::<(), i32>::new((), "a").unwrap();
        let b = Vertex::<(), i32>::new((), "b").unwrap();

        let edge = Edge::new(&a, &b, 3);

        assert_eq!(edge.src(), "a");
        assert_eq!(edge.dest(), "b");
        assert_eq!(edge.weight(), &3);
    }

    #[test]
    fn between_rejects_empty_keys() {
        assert_matches!(Edge::between("", "b", 1.0), Err(EmptyKeyError));
        assert_matches!(Edge::between("a", "", 1.0), Err(EmptyKeyError));
        assert_matches!(Edge::between("a", "b", 1.0), Ok(_));
    }

    #[test]
    fn matches_destination_only() {
        let edge = Edge::between("a", "b", 1.0).unwrap();

        assert!(edge.matches("b"));
        assert!(!edge.matches("a"));
    }

    #[test]
    fn weight_access() {
        let mut edge = Edge::between("a", "b", 1.0).unwrap();
        *edge.weight_mut() = 2.5;

        assert_eq!(edge.into_weight(), 2.5);
    }
}
