pub mod apply;
pub mod template;
