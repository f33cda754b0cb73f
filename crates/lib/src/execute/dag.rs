//! Dependency graph over a declared stack.
//!
//! Nodes are declaration positions; edges run from a referenced resource to
//! the resource that holds the reference. Only used when the orchestrator is
//! asked for topological ordering.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{Error, Result};
use crate::spec::SpecKey;
use crate::stack::Stack;

pub struct ExecutionDag {
  /// Node weights are positions in the stack.
  graph: DiGraph<usize, ()>,

  /// Node index per stack position.
  nodes: Vec<NodeIndex>,
}

impl ExecutionDag {
  /// Build the graph from every deferred reference in `stack`.
  ///
  /// A reference becomes an edge only when the exact spec it points at is
  /// declared in `stack`. References to specs outside the stack, including
  /// namesakes of declared ones, add no edge: they are either already
  /// resolved or rejected by preflight.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected` if the references form a cycle.
  pub fn from_stack(stack: &Stack) -> Result<Self> {
    let mut graph = DiGraph::new();
    let mut nodes = Vec::with_capacity(stack.len());
    let mut by_key: HashMap<SpecKey, NodeIndex> = HashMap::new();

    for (position, entry) in stack.entries().enumerate() {
      let idx = graph.add_node(position);
      by_key.insert(entry.key(), idx);
      nodes.push(idx);
    }

    for (position, entry) in stack.entries().enumerate() {
      for dep in entry.dependencies() {
        if let Some(&dep_idx) = by_key.get(&dep.key) {
          graph.update_edge(dep_idx, nodes[position], ());
        }
      }
    }

    let dag = Self { graph, nodes };
    dag.verify_acyclic()?;
    Ok(dag)
  }

  fn verify_acyclic(&self) -> Result<()> {
    toposort(&self.graph, None).map_err(|_| Error::CycleDetected)?;
    Ok(())
  }

  /// Stack positions with dependencies first.
  ///
  /// Among resources whose dependencies are all satisfied, the one declared
  /// earliest goes first, so the order is fully deterministic.
  pub fn topological_order(&self) -> Result<Vec<usize>> {
    let mut in_degree: Vec<usize> = self
      .nodes
      .iter()
      .map(|&idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
      .collect();

    let mut ready: BTreeSet<usize> = (0..self.nodes.len()).filter(|&p| in_degree[p] == 0).collect();
    let mut order = Vec::with_capacity(self.nodes.len());

    while let Some(position) = ready.pop_first() {
      order.push(position);
      for next in self.graph.neighbors_directed(self.nodes[position], Direction::Outgoing) {
        let dependent = self.graph[next];
        in_degree[dependent] = in_degree[dependent].saturating_sub(1);
        if in_degree[dependent] == 0 {
          ready.insert(dependent);
        }
      }
    }

    if order.len() != self.nodes.len() {
      return Err(Error::CycleDetected);
    }
    Ok(order)
  }

  /// Positions of the declared resources `position` references.
  pub fn dependencies(&self, position: usize) -> Vec<usize> {
    self.neighbors(position, Direction::Incoming)
  }

  /// Positions of the declared resources that reference `position`.
  pub fn dependents(&self, position: usize) -> Vec<usize> {
    self.neighbors(position, Direction::Outgoing)
  }

  fn neighbors(&self, position: usize, direction: Direction) -> Vec<usize> {
    let Some(&idx) = self.nodes.get(position) else {
      return Vec::new();
    };
    let mut out: Vec<usize> = self
      .graph
      .neighbors_directed(idx, direction)
      .map(|n| self.graph[n])
      .collect();
    out.sort_unstable();
    out
  }
}
