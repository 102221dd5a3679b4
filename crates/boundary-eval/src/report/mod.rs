pub mod html;
pub mod plots;
