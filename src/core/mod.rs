// Form controller and rendering exports
pub mod controller;
pub mod render;

pub use controller::{FormController, Phase, SubmitError, ViewState};
pub use render::{render, RenderedView};
