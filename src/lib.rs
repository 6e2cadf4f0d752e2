pub mod animation;
pub mod camera;
pub mod error;
pub mod render;
pub mod sheet;
pub mod transform;

pub use animation::{Frame, FrameSequencer, PlaybackState, SharedFrames};
pub use camera::Camera;
pub use error::{SpriteError, SpriteResult};
pub use render::{Canvas, RenderContext, Renderer};
pub use sheet::{SheetLayout, SpriteSheet};
pub use transform::SpriteImage;

pub const VERSION: &str = "0.1.0";
