use std::io::{self, Stdout, Write};

use cadence_scheduler::{RenderError, Renderer};

use crate::Burst;

/// Glyphs cycled through while no burst is active, indexed by frame number.
pub const IDLE_GLYPHS: [char; 4] = ['_', '-', '¯', '-'];

/// Writes one glyph per frame: the active burst's symbol while its count
/// lasts, otherwise a rolling idle wave.
pub struct AsciiRenderer<W: Write> {
    out: W,
    count: u32,
    symbol: char,
    frame: u64,
}

impl AsciiRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            count: 0,
            symbol: '.',
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn remaining(&self) -> u32 {
        self.count
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Advances one frame and returns the glyph to draw for it.
    fn advance(&mut self) -> char {
        self.frame += 1;
        let glyph = if self.count > 0 {
            self.symbol
        } else {
            IDLE_GLYPHS[(self.frame % IDLE_GLYPHS.len() as u64) as usize]
        };
        self.count = self.count.saturating_sub(1);
        glyph
    }
}

impl<W: Write> Renderer<Burst> for AsciiRenderer<W> {
    fn on_event(&mut self, event: Burst) {
        self.count = event.count;
        self.symbol = event.symbol;
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        let glyph = self.advance();
        write!(self.out, "{glyph}")?;
        self.out.flush()?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(err) = writeln!(self.out).and_then(|()| self.out.flush()) {
            tracing::warn!("failed to finish ascii output: {}", err);
        }
    }
}
