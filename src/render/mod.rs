pub mod body_renderer;
pub mod code_block;
pub mod highlight;
