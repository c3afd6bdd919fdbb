pub mod symbols;

pub use symbols::{symbols as render_symbols, RenderOptions};
