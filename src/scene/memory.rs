//! In-process scene graph used by tests and batch tools.

use std::collections::{BTreeMap, BTreeSet};

use super::{AttrValue, Connection, NodeId, NodeType, Plug, SceneError};
use crate::scene::SceneGraph;

#[derive(Debug)]
struct NodeData {
    ty: NodeType,
    name: String,
    attrs: BTreeMap<String, AttrValue>,
    attr_groups: BTreeSet<String>,
    members: Vec<NodeId>,
}

/// An in-memory [`SceneGraph`] that mimics the host's observable behavior:
/// name collisions auto-rename with the smallest free integer suffix, a
/// destination plug holds at most one incoming connection, and only grouping
/// nodes accept set members.
#[derive(Debug, Default)]
pub struct InMemoryScene {
    nodes: Vec<NodeData>,
    connections: Vec<Connection>,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    pub fn nodes_of_type(&self, ty: NodeType) -> Vec<NodeId> {
        self.node_ids()
            .filter(|id| self.nodes[id.0 as usize].ty == ty)
            .collect()
    }

    pub fn has_connection(&self, src: &Plug, dst: &Plug) -> bool {
        self.connections
            .iter()
            .any(|c| &c.src == src && &c.dst == dst)
    }

    pub fn attr_group_enabled(&self, node: NodeId, group: &str) -> bool {
        self.data(node)
            .map(|n| n.attr_groups.contains(group))
            .unwrap_or(false)
    }

    fn data(&self, node: NodeId) -> Result<&NodeData, SceneError> {
        self.nodes
            .get(node.0 as usize)
            .ok_or(SceneError::NodeNotFound(node))
    }

    fn data_mut(&mut self, node: NodeId) -> Result<&mut NodeData, SceneError> {
        self.nodes
            .get_mut(node.0 as usize)
            .ok_or(SceneError::NodeNotFound(node))
    }

    fn name_taken(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.name_taken(base) {
            return base.to_string();
        }
        let mut i = 1u32;
        loop {
            let candidate = format!("{base}{i}");
            if !self.name_taken(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    fn plug_display(&self, plug: &Plug) -> (String, String) {
        let node = self
            .data(plug.node)
            .map(|n| n.name.clone())
            .unwrap_or_else(|_| format!("{:?}", plug.node));
        (node, plug.attr.clone())
    }
}

impl SceneGraph for InMemoryScene {
    fn create_node(&mut self, ty: NodeType, name: &str) -> Result<NodeId, SceneError> {
        let name = self.unique_name(name);
        self.nodes.push(NodeData {
            ty,
            name,
            attrs: BTreeMap::new(),
            attr_groups: BTreeSet::new(),
            members: Vec::new(),
        });
        Ok(NodeId((self.nodes.len() - 1) as u32))
    }

    fn rename(&mut self, node: NodeId, name: &str) -> Result<String, SceneError> {
        let name = if self.data(node)?.name == name {
            name.to_string()
        } else {
            self.unique_name(name)
        };
        self.data_mut(node)?.name = name.clone();
        Ok(name)
    }

    fn node_name(&self, node: NodeId) -> Result<String, SceneError> {
        Ok(self.data(node)?.name.clone())
    }

    fn node_type(&self, node: NodeId) -> Result<NodeType, SceneError> {
        Ok(self.data(node)?.ty)
    }

    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<(), SceneError> {
        self.data_mut(node)?.attrs.insert(attr.to_string(), value);
        Ok(())
    }

    fn get_attr(&self, node: NodeId, attr: &str) -> Result<Option<AttrValue>, SceneError> {
        Ok(self.data(node)?.attrs.get(attr).cloned())
    }

    fn connect(&mut self, src: Plug, dst: Plug) -> Result<(), SceneError> {
        self.data(src.node)?;
        self.data(dst.node)?;
        if self.connections.iter().any(|c| c.dst == dst) {
            let (dst_node, dst_attr) = self.plug_display(&dst);
            return Err(SceneError::AlreadyConnected { dst_node, dst_attr });
        }
        self.connections.push(Connection { src, dst });
        Ok(())
    }

    fn connect_force(&mut self, src: Plug, dst: Plug) -> Result<(), SceneError> {
        self.data(src.node)?;
        self.data(dst.node)?;
        self.connections.retain(|c| c.dst != dst);
        self.connections.push(Connection { src, dst });
        Ok(())
    }

    fn disconnect(&mut self, src: Plug, dst: Plug) -> Result<(), SceneError> {
        self.data(src.node)?;
        self.data(dst.node)?;
        let before = self.connections.len();
        self.connections.retain(|c| !(c.src == src && c.dst == dst));
        if self.connections.len() == before {
            let (src_node, src_attr) = self.plug_display(&src);
            let (dst_node, dst_attr) = self.plug_display(&dst);
            return Err(SceneError::NotConnected {
                src_node,
                src_attr,
                dst_node,
                dst_attr,
            });
        }
        Ok(())
    }

    fn enable_attr_group(&mut self, node: NodeId, group: &str) -> Result<(), SceneError> {
        self.data_mut(node)?.attr_groups.insert(group.to_string());
        Ok(())
    }

    fn add_to_set(&mut self, set: NodeId, member: NodeId) -> Result<(), SceneError> {
        self.data(member)?;
        let set_data = self.data(set)?;
        if !set_data.ty.is_set() {
            return Err(SceneError::NotAGroup(set_data.name.clone()));
        }
        let set_data = self.data_mut(set)?;
        if !set_data.members.contains(&member) {
            set_data.members.push(member);
        }
        Ok(())
    }

    fn incoming_connection(
        &self,
        node: NodeId,
        attr: &str,
    ) -> Result<Option<Connection>, SceneError> {
        self.data(node)?;
        Ok(self
            .connections
            .iter()
            .find(|c| c.dst.node == node && c.dst.attr == attr)
            .cloned())
    }

    fn incoming_connections(&self, node: NodeId) -> Result<Vec<Connection>, SceneError> {
        self.data(node)?;
        Ok(self
            .connections
            .iter()
            .filter(|c| c.dst.node == node)
            .cloned()
            .collect())
    }

    fn outgoing_connections(&self, node: NodeId) -> Result<Vec<Connection>, SceneError> {
        self.data(node)?;
        Ok(self
            .connections
            .iter()
            .filter(|c| c.src.node == node)
            .cloned()
            .collect())
    }

    fn set_members(&self, set: NodeId) -> Result<Vec<NodeId>, SceneError> {
        Ok(self.data(set)?.members.clone())
    }
}
