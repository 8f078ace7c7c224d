//! Vision model integration: provider trait, concrete backends, and
//! defensive response parsing.

pub mod gemini;
pub mod ollama;
pub mod parse;
pub mod provider;

pub use parse::parse_response;
pub use provider::{
    resolve_env_var, ImageInput, VisionProvider, VisionProviderFactory, VisionRequest,
    VisionResponse,
};
