/// Card3D Core Library - Interactive 3D playing-card logic
///
/// This library provides the renderer-independent parts of the card widget:
/// the rounded-rectangle geometry builder, the spring-driven interaction and
/// flip controller, face selection, configuration and camera math.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod dimensions;
pub mod error;
pub mod geometry;
pub mod outline;
pub mod projection;
pub mod spring;
pub mod surface;
pub mod transform;
pub mod widget;

// Re-export commonly used types
pub use catalog::FaceCatalog;
pub use config::CardConfig;
pub use controller::{AnimationRequest, CardController, CardEvent, InteractionState};
pub use dimensions::CardDimensions;
pub use error::{CardError, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use outline::{build_outline, PathSegment, RoundedOutline};
pub use projection::{screen_to_ndc, Camera, ORBIT_DISTANCE};
pub use spring::{RestPolicy, Spring, SpringConfig};
pub use surface::{build_surface, Surface};
pub use transform::{Orientation, Transform};
pub use widget::CardWidget;
