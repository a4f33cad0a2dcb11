// src/automaton/visual.rs
// Read-only node/edge emission for renderers, plus a Graphviz DOT sink.

use std::{collections::BTreeMap, fmt::Write as _};

use hashbrown::HashSet;

use super::graph::{Automaton, StateId, walk};

/// Receives the graph in discovery order: every node first, then every edge.
/// Parallel edges to the same target arrive as one edge with a merged label.
pub trait GraphSink {
    fn node(&mut self, id: StateId, accepting: bool);
    fn edge(&mut self, from: StateId, to: StateId, label: &str);
}

pub fn emit_graph<A, S>(automaton: &A, sink: &mut S)
where
    A: Automaton + ?Sized,
    S: GraphSink + ?Sized,
{
    let start = automaton.start();
    // No start state (an empty DFA, a destroyed NFA): nothing to draw.
    if automaton.accept_tokens(start).is_none() {
        return;
    }
    let mut visited = HashSet::new();
    let order = walk(automaton, start, &mut visited);

    for &id in &order {
        sink.node(id, automaton.is_accepting(id));
    }
    for &id in &order {
        let mut by_target: BTreeMap<StateId, Vec<u8>> = BTreeMap::new();
        for (b, to) in automaton.edges(id) {
            by_target.entry(to).or_default().push(b);
        }
        for (to, bytes) in by_target {
            sink.edge(id, to, &edge_label(&bytes));
        }
    }
}

fn byte_repr(out: &mut String, b: u8) {
    if b.is_ascii_graphic() {
        out.push(b as char);
    } else {
        let _ = write!(out, "{}", b.escape_ascii());
    }
}

/// `a`, `[a-c]`, `[a-cx]`: contiguous runs collapse to `lo-hi`, and labels
/// covering more than one byte are bracketed.
pub fn edge_label(bytes: &[u8]) -> String {
    let mut sorted = bytes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut out = String::new();
    if sorted.len() > 1 {
        out.push('[');
    }
    let mut i = 0;
    while i < sorted.len() {
        let lo = sorted[i];
        let mut hi = lo;
        while i + 1 < sorted.len() && sorted[i + 1] == hi + 1 {
            i += 1;
            hi = sorted[i];
        }
        byte_repr(&mut out, lo);
        if hi != lo {
            out.push('-');
            byte_repr(&mut out, hi);
        }
        i += 1;
    }
    if sorted.len() > 1 {
        out.push(']');
    }
    out
}

/// Collects emitted nodes and edges into DOT text.
#[derive(Debug, Default)]
pub struct DotWriter {
    start: Option<StateId>,
    nodes: String,
    edges: String,
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl DotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        let mut dot =
            String::from("digraph G {\n  rankdir=LR;\n  empty [label = \"\" shape = plaintext];\n");
        dot.push_str(&self.nodes);
        if let Some(start) = self.start {
            let _ = writeln!(dot, "  empty -> {start} [label = \"start\"];");
        }
        dot.push_str(&self.edges);
        dot.push_str("}\n");
        dot
    }
}

impl GraphSink for DotWriter {
    fn node(&mut self, id: StateId, accepting: bool) {
        self.start.get_or_insert(id);
        let shape = if accepting { "doublecircle" } else { "circle" };
        let _ = writeln!(self.nodes, "  {id} [shape = {shape}];");
    }

    fn edge(&mut self, from: StateId, to: StateId, label: &str) {
        let _ = writeln!(
            self.edges,
            "  {from} -> {to} [label = \"{}\"];",
            dot_escape(label)
        );
    }
}

pub fn to_dot<A: Automaton + ?Sized>(automaton: &A) -> String {
    let mut w = DotWriter::new();
    emit_graph(automaton, &mut w);
    w.finish()
}
