//! Traversal helpers over live scene connections.

use std::collections::HashSet;

use crate::scene::{NodeId, NodeType, SceneError, SceneGraph};

/// Nodes reachable by walking incoming connections from `start`, including
/// `start` itself, in depth-first visit order.
pub fn upstream_reachable<S: SceneGraph>(
    scene: &S,
    start: NodeId,
) -> Result<Vec<NodeId>, SceneError> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut order: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = vec![start];

    while let Some(n) = stack.pop() {
        if !visited.insert(n) {
            continue;
        }
        order.push(n);
        for conn in scene.incoming_connections(n)? {
            stack.push(conn.src.node);
        }
    }
    Ok(order)
}

/// Upstream nodes of `start` restricted to one node kind. `start` itself is
/// only included when it matches.
pub fn upstream_nodes_of_type<S: SceneGraph>(
    scene: &S,
    start: NodeId,
    ty: NodeType,
) -> Result<Vec<NodeId>, SceneError> {
    let mut out = Vec::new();
    for node in upstream_reachable(scene, start)? {
        if scene.node_type(node)? == ty {
            out.push(node);
        }
    }
    Ok(out)
}
