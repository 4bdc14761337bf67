//! Doubly-linked list with stable node handles.
//!
//! Nodes live in a slab and are linked by index. A [`NodeId`] carries the
//! generation of the cell it points to, so a handle to a removed node is
//! rejected even after its cell has been reused.

use std::iter::FusedIterator;

use crate::core::error::{InsertError, InsertErrorKind, ListError};

/// Lookup of list items by a key, used by [`List::find_node`].
pub trait Matches<K: ?Sized> {
    fn matches(&self, key: &K) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
struct Cell<T> {
    generation: u32,
    node: Option<Node<T>>,
}

#[derive(Debug, Clone)]
pub struct List<T> {
    cells: Vec<Cell<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ListError> {
        let mut list = Self::new();
        list.cells
            .try_reserve_exact(capacity)
            .map_err(|_| ListError::CapacityOverflow)?;
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head.map(|index| self.id_of(index))
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail.map(|index| self.id_of(index))
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next.map(|index| self.id_of(index))
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.prev.map(|index| self.id_of(index))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.item)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.item)
    }

    pub fn push_back(&mut self, item: T) -> Result<NodeId, InsertError<T>> {
        let node = Node {
            item,
            prev: self.tail,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.cells[index].node = Some(node);
                index
            }
            None => {
                if self.cells.try_reserve(1).is_err() {
                    return Err(InsertError::new(
                        node.item,
                        InsertErrorKind::CapacityOverflow,
                    ));
                }

                self.cells.push(Cell {
                    generation: 0,
                    node: Some(node),
                });
                self.cells.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.link_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }

        self.tail = Some(index);
        self.len += 1;

        Ok(self.id_of(index))
    }

    pub fn find_node<K: ?Sized>(&self, key: &K) -> Option<NodeId>
    where
        T: Matches<K>,
    {
        self.find_node_by(|item| item.matches(key))
    }

    pub fn find_node_by<F>(&self, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&T) -> bool,
    {
        let mut current = self.head;

        while let Some(index) = current {
            let node = self.cells[index].node.as_ref()?;
            if predicate(&node.item) {
                return Some(self.id_of(index));
            }
            current = node.next;
        }

        None
    }

    /// Unlinks the node and returns its item.
    pub fn remove(&mut self, id: NodeId) -> Result<T, ListError> {
        if self.node(id).is_none() {
            return Err(ListError::StaleNode);
        }

        let cell = &mut self.cells[id.index];
        let node = cell.node.take().ok_or(ListError::StaleNode)?;
        cell.generation = cell.generation.wrapping_add(1);

        match node.prev {
            Some(prev) => self.link_mut(prev).next = node.next,
            None => self.head = node.next,
        }

        match node.next {
            Some(next) => self.link_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.free.push(id.index);
        self.len -= 1;

        Ok(node.item)
    }

    /// Removes every node, front to back, and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        let mut current = self.head();

        while let Some(id) = current {
            // The successor must be read before the node goes away.
            current = self.next(id);

            if self.remove(id).is_ok() {
                removed += 1;
            }
        }

        debug_assert!(self.is_empty());
        removed
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn id_of(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.cells[index].generation,
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.cells
            .get(id.index)
            .filter(|cell| cell.generation == id.generation)
            .and_then(|cell| cell.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.cells
            .get_mut(id.index)
            .filter(|cell| cell.generation == id.generation)
            .and_then(|cell| cell.node.as_mut())
    }

    // Indices stored in links always point to occupied cells.
    fn link_mut(&mut self, index: usize) -> &mut Node<T> {
        self.cells[index]
            .node
            .as_mut()
            .expect("linked node does not exist")
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    list: &'a List<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.list.cells[self.front?].node.as_ref()?;
        self.front = node.next;
        self.remaining -= 1;

        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.list.cells[self.back?].node.as_ref()?;
        self.back = node.prev;
        self.remaining -= 1;

        Some(&node.item)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}
