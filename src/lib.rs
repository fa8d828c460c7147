pub mod canvas;
pub mod contents_json;
pub mod enhance;
pub mod icon_gen;
pub mod label;
pub mod render;
