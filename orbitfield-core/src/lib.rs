/// orbitfield core library - scene, animation and software rasterization
///
/// Four primitive meshes orbit a shared circle, driven by a wheel-fed angular
/// speed that decays every frame; a particle field and a directional light
/// complete the scene. Front ends feed input and present a `FrameBuffer`.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod material;
pub mod panel;
pub mod particles;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use animation::{advance, AngularState, AnimationState, CursorState, FrameClock, Motion};
pub use config::SceneConfig;
pub use error::SceneError;
pub use geometry::{Mesh, Primitive, Triangle, Vertex};
pub use material::{DirectionalLight, Hsv, Material, Rgb};
pub use panel::{Control, DebugPanel};
pub use projection::Camera;
pub use raster::{FrameBuffer, Shade};
pub use scene::{OrbitingObject, Scene};
pub use transform::{RotationState, Transform};
