pub mod ascii;
pub mod debug;
pub mod emitters;
pub mod rng;

pub use ascii::{AsciiRenderer, IDLE_GLYPHS};
pub use debug::DebugRenderer;
pub use emitters::{RandomEmitter, ScriptedEmitter, TestEmitter};
pub use rng::XorShift64;

/// Draw `symbol` for the next `count` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub count: u32,
    pub symbol: char,
}

impl Burst {
    pub fn new(count: u32, symbol: char) -> Self {
        Self { count, symbol }
    }
}
