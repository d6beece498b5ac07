//! Reference index for snapshot connections.
//!
//! [`ConnectionGraph`] stores every "references" edge of a capture in a petgraph [`GraphMap`]
//! keyed by [`Node`], so both directions of a node's adjacency are a single hash lookup away.

use petgraph::{graphmap::GraphMap, Directed, Direction};
use std::ops::Deref;

use super::Connection;
use crate::node::Node;

pub type NodeGraph = GraphMap<Node, (), Directed>;

#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph(pub NodeGraph);

impl ConnectionGraph {
    pub fn as_graph(&self) -> &NodeGraph {
        &self.0
    }

    pub fn as_graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.0
    }

    /// Build the index. Repeated connections between the same pair of nodes collapse into one
    /// edge.
    pub fn from_connections<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = Connection>,
    {
        ConnectionGraph(NodeGraph::from_edges(
            iterable
                .into_iter()
                .map(|connection| (connection.from, connection.to)),
        ))
    }

    pub fn connect(&mut self, from: Node, to: Node) {
        self.as_graph_mut().add_edge(from, to, ());
    }

    /// Nodes holding a reference to `node`, in insertion order.
    pub fn referencers(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.as_graph()
            .neighbors_directed(node, Direction::Incoming)
    }

    /// Nodes `node` holds a reference to, in insertion order.
    pub fn references(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.as_graph()
            .neighbors_directed(node, Direction::Outgoing)
    }

    pub fn connections(&self, node: Node, direction: Direction) -> Vec<Connection> {
        match direction {
            Direction::Incoming => self
                .referencers(node)
                .map(|from| Connection::new(from, node))
                .collect(),
            Direction::Outgoing => self
                .references(node)
                .map(|to| Connection::new(node, to))
                .collect(),
        }
    }

    pub fn all_connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.as_graph()
            .all_edges()
            .map(|(from, to, _)| Connection::new(from, to))
    }
}

impl Deref for ConnectionGraph {
    type Target = NodeGraph;
    fn deref(&self) -> &NodeGraph {
        &self.0
    }
}
