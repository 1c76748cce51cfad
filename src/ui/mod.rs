pub mod popup;
pub mod view;

pub use popup::Popup;
pub use view::{PageView, RecordingView};
