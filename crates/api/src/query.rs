//! Query parameter types shared by several handler modules.

use serde::Deserialize;

/// `?cascade=true` on delete endpoints of entities that own children.
#[derive(Debug, Default, Deserialize)]
pub struct CascadeParams {
    #[serde(default)]
    pub cascade: bool,
}
