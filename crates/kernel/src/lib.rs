//! Scene kernel: object setup, the per-frame animation and scene configuration.
//!
//! # Invariants
//! - `Scene::animate` is the only thing that moves objects after setup.
//! - Only the camera rig and the section meshes move; particles and the light
//!   keep their setup transforms.
//! - Animation is a pure function of the previous rig state and the frame input.

pub mod animate;
pub mod clock;
pub mod config;
pub mod scene;

pub use animate::{FrameInput, FrameStats};
pub use clock::{FrameTime, SceneClock};
pub use config::{CameraConfig, ConfigError, LightConfig, MotionConfig, ParticleConfig, SceneConfig};
pub use scene::{CameraRig, DirectionalLight, Scene, SceneObject, SectionMesh};
