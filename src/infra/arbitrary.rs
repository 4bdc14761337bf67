use std::fmt;

use arbitrary::{Arbitrary, Unstructured};

use crate::graph::Graph;

use super::modeling::{MutOp, KEY_SPACE};

pub struct MutOpsSeq<V, W>(pub Vec<MutOp<V, W>>);

impl<V, W> IntoIterator for MutOpsSeq<V, W> {
    type Item = MutOp<V, W>;
    type IntoIter = std::vec::IntoIter<MutOp<V, W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<V, W> MutOpsSeq<V, W> {
    /// Applies the operations while printing them as code that reproduces the
    /// run.
    pub fn replay(self, graph: &mut Graph<V, W>)
    where
        V: fmt::Debug,
        W: fmt::Debug,
    {
        println!("let mut graph = Graph::default();");
        println!();

        for op in self {
            match &op {
                MutOp::AddVertex(key, data, policy) => println!(
                    "graph.add_vertex(Vertex::new({data:?}, \"{key}\").unwrap(), InsertPolicy::{policy:?});"
                ),
                MutOp::RemoveVertex(key) => println!("graph.remove_vertex(\"{key}\");"),
                MutOp::RemoveAllVertices => println!("graph.remove_all_vertices();"),
                MutOp::AddEdge(src, dest, weight) => println!(
                    "graph.add_edge(Edge::between(\"{src}\", \"{dest}\", {weight:?}).unwrap());"
                ),
                MutOp::RemoveEdge(src, dest) => {
                    println!("graph.remove_edge(\"{src}\", \"{dest}\");")
                }
                MutOp::RemoveAllEdges => println!("graph.remove_all_edges();"),
            }

            op.apply(graph);
        }

        println!();
        println!("check_consistency(&graph).unwrap();");
    }
}

impl<V: fmt::Debug, W: fmt::Debug> fmt::Debug for MutOpsSeq<V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MutOpsSeq(vec![")?;

        for op in self.0.iter() {
            writeln!(f, "    MutOp::{:?},", op)?;
        }

        writeln!(f, "])")?;
        writeln!(f, ".replay(&mut graph);")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum OpKind {
    AddVertex,
    AddEdge,
    RemoveVertex,
    RemoveEdge,
    RemoveAllVertices,
    RemoveAllEdges,
}

impl<'a, V, W> Arbitrary<'a> for MutOpsSeq<V, W>
where
    V: Arbitrary<'a>,
    W: Arbitrary<'a>,
{
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let n_target = KEY_SPACE as usize;
        let r = u.nice_f64()?;

        let m_target = ((n_target * n_target) as f64 * r).round().max(1.0) as usize;

        let total = u.len().max(1);

        let mut n = 0usize;
        let mut m = 0usize;
        let mut seq = Vec::new();

        while !u.is_empty() {
            let rv = (n as f64 / n_target as f64).min(1.0);
            let re = (m as f64 / m_target as f64).min(1.0);
            let r = (total - u.len()) as f64 / total as f64;

            let op = match arbitrary_op(u, rv, re, r) {
                Ok(op) => op,
                Err(_) => break,
            };

            // Only estimates, the operations may fail when applied.
            match op {
                MutOp::AddVertex(_, _, _) => n += 1,
                MutOp::RemoveVertex(_) => n = n.saturating_sub(1),
                MutOp::RemoveAllVertices => {
                    n = 0;
                    m = 0;
                }
                MutOp::AddEdge(_, _, _) => m += 1,
                MutOp::RemoveEdge(_, _) => m = m.saturating_sub(1),
                MutOp::RemoveAllEdges => m = 0,
            }

            seq.push(op);
        }

        Ok(MutOpsSeq(seq))
    }
}

fn arbitrary_op<'a, V, W>(
    u: &mut Unstructured<'a>,
    rv: f64,
    re: f64,
    r: f64,
) -> arbitrary::Result<MutOp<V, W>>
where
    V: Arbitrary<'a>,
    W: Arbitrary<'a>,
{
    // Adding gets less likely as the graph fills up. Progress through the
    // input is mixed in so that edges keep coming until the end.
    let wv = non_linear_decrease(0.4 * rv + 0.6 * r);
    let we = non_linear_decrease(0.6 * re + 0.4 * r);

    u.choose_weighted(
        &[
            OpKind::AddVertex,
            OpKind::AddEdge,
            OpKind::RemoveVertex,
            OpKind::RemoveEdge,
            OpKind::RemoveAllVertices,
            OpKind::RemoveAllEdges,
        ],
        &[wv, we, (1.0 - wv) * 0.25, (1.0 - we) * 0.5, 0.01, 0.01],
    )
    .and_then(|kind| match kind {
        OpKind::AddVertex => Ok(MutOp::AddVertex(
            u.arbitrary()?,
            u.arbitrary()?,
            u.arbitrary()?,
        )),
        OpKind::AddEdge => Ok(MutOp::AddEdge(
            u.arbitrary()?,
            u.arbitrary()?,
            u.arbitrary()?,
        )),
        OpKind::RemoveVertex => Ok(MutOp::RemoveVertex(u.arbitrary()?)),
        OpKind::RemoveEdge => Ok(MutOp::RemoveEdge(u.arbitrary()?, u.arbitrary()?)),
        OpKind::RemoveAllVertices => Ok(MutOp::RemoveAllVertices),
        OpKind::RemoveAllEdges => Ok(MutOp::RemoveAllEdges),
    })
}

trait UnstructuredExt {
    fn nice_f64(&mut self) -> arbitrary::Result<f64>;
    fn choose_weighted<'b, T>(
        &mut self,
        choices: &'b [T],
        weights: &'b [f64],
    ) -> arbitrary::Result<&'b T>;
}

impl<'a> UnstructuredExt for Unstructured<'a> {
    fn nice_f64(&mut self) -> arbitrary::Result<f64> {
        const RESOLUTION: u8 = 100;
        let int = self.int_in_range(0..=RESOLUTION)?;
        Ok(int as f64 / RESOLUTION as f64)
    }

    fn choose_weighted<'b, T>(
        &mut self,
        choices: &'b [T],
        weights: &'b [f64],
    ) -> arbitrary::Result<&'b T> {
        if choices.is_empty() || choices.len() != weights.len() {
            return Err(arbitrary::Error::EmptyChoose);
        }

        let weight_sum = weights.iter().copied().sum::<f64>();
        let bound = self.nice_f64()? * weight_sum;

        let mut acc = 0.0;
        for (choice, weight) in choices.iter().zip(weights.iter().copied()) {
            acc += weight;

            if acc >= bound {
                return Ok(choice);
            }
        }

        // Rounding may leave the bound just above the sum.
        choices.last().ok_or(arbitrary::Error::EmptyChoose)
    }
}

// f(0) = 1, f(1) ~= 0.152
fn non_linear_decrease(x: f64) -> f64 {
    1.0 / (x + 1.0).powf(std::f64::consts::E)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use fastrand::Rng;

    use super::*;
    use crate::infra::testing::check_consistency;

    fn random_bytes(rng: &mut Rng, len: usize) -> Vec<u8> {
        std::iter::repeat_with(|| rng.u8(..)).take(len).collect()
    }

    #[test]
    fn mut_ops_seq_arbitrary_sanity() {
        let mut rng = Rng::with_seed(3);
        let mut frequency = HashMap::<_, usize>::new();

        for _ in 0..20 {
            let bytes = random_bytes(&mut rng, 4096);
            let mut u = Unstructured::new(&bytes);
            let seq = MutOpsSeq::<i8, i8>::arbitrary(&mut u).unwrap();

            for op in seq.0.iter() {
                let kind = match op {
                    MutOp::AddVertex(_, _, _) => OpKind::AddVertex,
                    MutOp::AddEdge(_, _, _) => OpKind::AddEdge,
                    MutOp::RemoveVertex(_) => OpKind::RemoveVertex,
                    MutOp::RemoveEdge(_, _) => OpKind::RemoveEdge,
                    MutOp::RemoveAllVertices => OpKind::RemoveAllVertices,
                    MutOp::RemoveAllEdges => OpKind::RemoveAllEdges,
                };
                *frequency.entry(kind).or_default() += 1;
            }

            let mut graph = Graph::default();
            for op in seq {
                op.apply(&mut graph);
                check_consistency(&graph).unwrap();
            }
        }

        let count = |kind| frequency.get(&kind).copied().unwrap_or_default();

        assert!(count(OpKind::AddVertex) > 0);
        assert!(count(OpKind::AddEdge) > 0);
        assert!(count(OpKind::AddEdge) > count(OpKind::RemoveAllEdges));
    }
}
