pub mod form;
pub mod wheel;

pub use form::{FormLayout, render_form};
pub use wheel::{ItemStyle, WheelView, item_style, render_wheel};
