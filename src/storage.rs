//! Containers backing the graph.
//!
//! * [`HashTable`] maps vertex keys to vertices. It uses open addressing and
//!   marks removed entries with tombstones, so any full scan has to skip both
//!   empty and tombstoned slots (see [`Slot`]).
//! * [`List`] holds the outgoing edges of a single vertex in insertion order.
//!
//! |                | **[HashTable]** | **[List]**  |
//! |----------------|-----------------|-------------|
//! | insert         | _O*(1)_         | _O*(1)_     |
//! | lookup by key  | _O(1)_ average  | _O(n)_      |
//! | remove         | _O(1)_ average  | _O(1)_      |
//! | full scan      | _O(capacity)_   | _O(n)_      |
//!
//! * _O*(..)_ – amortized complexity

pub mod list;
pub mod table;

#[doc(inline)]
pub use self::{
    list::{List, Matches, NodeId},
    table::{HashTable, Slot},
};
