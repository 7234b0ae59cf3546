pub mod background;
pub mod form;
pub mod result;
pub mod theme;
