//! Scene-graph capability used by every build and publish operation.
//!
//! The host application's live scene is an ambient mutable graph; here it is
//! modelled as an explicit handle so the same assembly logic can run against
//! host bindings in production and against [`InMemoryScene`] in tests and
//! batch tools. All operations are synchronous and take `&mut self` — the
//! host serializes scripted scene edits on a single thread and this crate
//! adds no locking of its own.

mod memory;

pub use memory::InMemoryScene;

use thiserror::Error;

/// Opaque handle to a node owned by the scene graph.
///
/// Handles stay valid for the lifetime of the scene; this crate never
/// deletes nodes it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// The closed set of node kinds this pipeline creates or inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    StandardShader,
    TwoSidedShader,
    BlendShader,
    ShadingGroup,
    FileTexture,
    PtexTexture,
    Place2d,
    Place3d,
    ColorCorrect,
    Projection,
    ColorComposite,
    Displacement,
    Mesh,
}

impl NodeType {
    pub fn type_name(self) -> &'static str {
        match self {
            NodeType::StandardShader => "standard_shader",
            NodeType::TwoSidedShader => "two_sided_shader",
            NodeType::BlendShader => "blend_shader",
            NodeType::ShadingGroup => "shading_group",
            NodeType::FileTexture => "file_texture",
            NodeType::PtexTexture => "ptex_texture",
            NodeType::Place2d => "place_2d",
            NodeType::Place3d => "place_3d",
            NodeType::ColorCorrect => "color_correct",
            NodeType::Projection => "projection",
            NodeType::ColorComposite => "color_composite",
            NodeType::Displacement => "displacement",
            NodeType::Mesh => "mesh",
        }
    }

    /// Node kinds that can hold set members (shading assignment, displacement
    /// membership).
    pub fn is_set(self) -> bool {
        matches!(self, NodeType::ShadingGroup | NodeType::Displacement)
    }
}

/// Attribute value as the host stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec3([f64; 3]),
    Str(String),
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

/// One end of a connection: a node plus one of its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plug {
    pub node: NodeId,
    pub attr: String,
}

impl Plug {
    pub fn new(node: NodeId, attr: impl Into<String>) -> Self {
        Plug {
            node,
            attr: attr.into(),
        }
    }
}

/// A directed attribute connection. A destination plug holds at most one
/// incoming connection; sources fan out freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub src: Plug,
    pub dst: Plug,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist in the scene")]
    NodeNotFound(NodeId),
    #[error("`{dst_node}.{dst_attr}` already has an incoming connection")]
    AlreadyConnected { dst_node: String, dst_attr: String },
    #[error("`{src_node}.{src_attr}` is not connected to `{dst_node}.{dst_attr}`")]
    NotConnected {
        src_node: String,
        src_attr: String,
        dst_node: String,
        dst_attr: String,
    },
    #[error("node `{node}` has no attribute `{attr}`")]
    MissingAttribute { node: String, attr: String },
    #[error("node `{0}` is not a grouping node and cannot hold set members")]
    NotAGroup(String),
}

/// Mutation and inspection surface of the host scene graph.
///
/// Failures are non-recoverable for the current build and propagate to the
/// caller; the host provides no transactional edit primitive, so partial
/// mutations performed before a failure are not rolled back here.
pub trait SceneGraph {
    /// Create a node. The scene owns the result; if `name` is taken the
    /// scene picks a free one (host-style integer suffix), so read the
    /// final name back with [`SceneGraph::node_name`].
    fn create_node(&mut self, ty: NodeType, name: &str) -> Result<NodeId, SceneError>;

    /// Rename a node, returning the name actually applied after collision
    /// handling.
    fn rename(&mut self, node: NodeId, name: &str) -> Result<String, SceneError>;

    fn node_name(&self, node: NodeId) -> Result<String, SceneError>;

    fn node_type(&self, node: NodeId) -> Result<NodeType, SceneError>;

    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<(), SceneError>;

    fn get_attr(&self, node: NodeId, attr: &str) -> Result<Option<AttrValue>, SceneError>;

    /// Connect `src` into `dst`. Fails with [`SceneError::AlreadyConnected`]
    /// when the destination plug is occupied.
    fn connect(&mut self, src: Plug, dst: Plug) -> Result<(), SceneError>;

    /// Connect `src` into `dst`, replacing any existing incoming connection
    /// on the destination plug.
    fn connect_force(&mut self, src: Plug, dst: Plug) -> Result<(), SceneError>;

    fn disconnect(&mut self, src: Plug, dst: Plug) -> Result<(), SceneError>;

    /// Activate a host-side extension attribute group on a node (subdivision
    /// and displacement controls live behind these).
    fn enable_attr_group(&mut self, node: NodeId, group: &str) -> Result<(), SceneError>;

    /// Add `member` to a grouping node (shading group or displacement set).
    fn add_to_set(&mut self, set: NodeId, member: NodeId) -> Result<(), SceneError>;

    fn incoming_connection(
        &self,
        node: NodeId,
        attr: &str,
    ) -> Result<Option<Connection>, SceneError>;

    fn incoming_connections(&self, node: NodeId) -> Result<Vec<Connection>, SceneError>;

    fn outgoing_connections(&self, node: NodeId) -> Result<Vec<Connection>, SceneError>;

    fn set_members(&self, set: NodeId) -> Result<Vec<NodeId>, SceneError>;
}
