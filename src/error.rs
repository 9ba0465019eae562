//! Build-time error taxonomy.

use thiserror::Error;

use crate::classify::Role;
use crate::material::ShaderType;
use crate::scene::SceneError;

/// Fatal build failures. Every variant except [`BuildError::Scene`] is
/// raised before any node is created, so a failed build either mutated
/// nothing or stopped at a host-call failure the caller must handle at the
/// host level (there is no scene-edit transaction to roll back).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("shader type `{shader}` has no entry in the connection-rule table")]
    UnsupportedShaderType { shader: String },

    #[error("texture role `{role}` has no connection rule for shader type `{shader}`")]
    UnknownConnectionRule { shader: ShaderType, role: Role },

    #[error("blend shader networks are not implemented")]
    NotImplemented,

    #[error(transparent)]
    Scene(#[from] SceneError),
}
