//! WebGPU rendering module
//!
//! Raymarches the whole tower scene with SDFs in the fragment shader.

pub mod scene_pipeline;

pub use scene_pipeline::SceneRenderState;
