use std::fmt;

use proptest::{
    collection::{self, SizeRange},
    prelude::*,
};

use crate::core::InsertPolicy;

use super::modeling::{Key, MutOp, KEY_SPACE};

pub fn key() -> impl Strategy<Value = Key> {
    (0..KEY_SPACE).prop_map(Key)
}

pub fn insert_policy() -> impl Strategy<Value = InsertPolicy> {
    prop_oneof![Just(InsertPolicy::Reject), Just(InsertPolicy::Overwrite)]
}

/// Single mutation, biased towards adding vertices and edges.
pub fn mut_op<V, W>(vertex: V, weight: W) -> impl Strategy<Value = MutOp<V::Value, W::Value>>
where
    V: Strategy,
    W: Strategy,
    V::Value: Clone + fmt::Debug,
    W::Value: Clone + fmt::Debug,
{
    prop_oneof![
        4 => (key(), vertex, insert_policy())
            .prop_map(|(key, data, policy)| MutOp::AddVertex(key, data, policy)),
        2 => key().prop_map(MutOp::RemoveVertex),
        1 => Just(MutOp::RemoveAllVertices),
        6 => (key(), key(), weight).prop_map(|(src, dest, weight)| MutOp::AddEdge(src, dest, weight)),
        3 => (key(), key()).prop_map(|(src, dest)| MutOp::RemoveEdge(src, dest)),
        1 => Just(MutOp::RemoveAllEdges),
    ]
}

pub fn mut_ops<V, W>(
    vertex: V,
    weight: W,
    size: impl Into<SizeRange>,
) -> impl Strategy<Value = Vec<MutOp<V::Value, W::Value>>>
where
    V: Strategy,
    W: Strategy,
    V::Value: Clone + fmt::Debug,
    W::Value: Clone + fmt::Debug,
{
    collection::vec(mut_op(vertex, weight), size)
}
