#![no_main]

use libfuzzer_sys::fuzz_target;

use keygraph::{
    graph::Graph,
    infra::{arbitrary::MutOpsSeq, modeling::Model},
};

fuzz_target!(|ops: MutOpsSeq<i8, i8>| {
    let mut graph = Graph::default();
    let mut model = Model::new();

    for op in ops {
        let expected = model.apply(op.clone());
        let actual = op.apply(&mut graph);

        assert_eq!(actual, expected);
        model
            .check(&graph)
            .as_ref()
            .map_err(ToString::to_string)
            .unwrap();
    }
});
