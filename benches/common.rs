#![allow(dead_code)]

use fastrand::Rng;
use keygraph::prelude::*;

pub const RANDOM_SEED: u64 = 0xef6f79ed30ba75a;

pub fn key(index: usize) -> String {
    format!("vertex-{index}")
}

/// Random simple digraph sampling, each pair of distinct vertices is
/// connected with probability `p` in a random direction.
pub struct RandomEdges {
    v: usize,
    w: usize,
    n: usize,
    p: f32,
}

impl RandomEdges {
    pub fn new(vertex_count: usize, p: f32) -> Self {
        Self {
            v: 1,
            w: usize::MAX,
            n: vertex_count,
            p,
        }
    }

    pub fn next_edge(&mut self, rng: &mut Rng) -> Option<(usize, usize)> {
        let Self { v, w, .. } = self;
        let n = self.n;
        let p = self.p;

        if *v >= n {
            return None;
        }

        let r = rng.f32();
        *w = w.wrapping_add(1) + ((1.0 - r).log10() / (1.0 - p).log10()).floor() as usize;

        while *w >= *v && *v < n {
            *w -= *v;
            *v += 1;
        }

        if *v < n {
            if rng.bool() {
                Some((*v, *w))
            } else {
                Some((*w, *v))
            }
        } else {
            None
        }
    }
}

pub fn random_graph(vertex_count: usize, density: f32, rng: &mut Rng) -> Graph<u32, f32> {
    let mut graph = Graph::default();

    for i in 0..vertex_count {
        let vertex = Vertex::new(rng.u32(0..100), &key(i)).unwrap();
        graph.add_vertex(vertex, InsertPolicy::Reject).unwrap();
    }

    let mut edges = RandomEdges::new(vertex_count, density);

    while let Some((u, v)) = edges.next_edge(rng) {
        let edge = Edge::between(&key(u), &key(v), rng.f32()).unwrap();
        graph.add_edge(edge).unwrap();
    }

    graph
}
