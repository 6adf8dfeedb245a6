//! Render module - timer face and its view model

mod face;
mod view;

pub use face::{FaceAction, SessionFace, Theme};
pub use view::SessionView;
