use keygraph::{
    core::InsertPolicy,
    graph::Graph,
    infra::{
        modeling::{Key, Model, MutOp},
        proptest::mut_ops,
        testing::check_consistency,
    },
};
use proptest::prelude::*;

fn apply_all(ops: Vec<MutOp<u8, i16>>) -> Result<(), TestCaseError> {
    let mut graph = Graph::default();
    let mut model = Model::new();

    for op in ops {
        let expected = model.apply(op.clone());
        let actual = op.apply(&mut graph);

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(check_consistency(&graph), Ok(()));
        prop_assert_eq!(model.check(&graph), Ok(()));
        prop_assert_eq!(graph.size(), model.vertex_count());
        prop_assert_eq!(graph.edge_count(), model.edge_count());
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_graph_matches_model(ops in mut_ops(any::<u8>(), any::<i16>(), 0..200)) {
        apply_all(ops)?;
    }
}

#[test]
fn readded_key_has_no_stale_edges() {
    let mut graph = Graph::<u8, i16>::default();
    let ops = vec![
        MutOp::AddVertex(Key(1), 1, InsertPolicy::Reject),
        MutOp::AddVertex(Key(2), 2, InsertPolicy::Reject),
        MutOp::AddEdge(Key(2), Key(1), 7),
        MutOp::RemoveVertex(Key(1)),
        MutOp::AddVertex(Key(1), 3, InsertPolicy::Reject),
    ];

    for op in ops {
        op.apply(&mut graph);
    }

    assert!(!graph.has_edge("v2", "v1"));
    assert_eq!(graph.get_vertex("v1").and_then(|vertex| vertex.data()), Some(&3));
    check_consistency(&graph).unwrap();
}
