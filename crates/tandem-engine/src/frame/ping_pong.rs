/// Which physical copy is read and which is written.
///
/// Bind group 0 reads A and writes B; bind group 1 reads B and writes A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    ReadAWriteB,
    ReadBWriteA,
}

impl Phase {
    /// The single transition.
    pub fn flip(self) -> Self {
        match self {
            Phase::ReadAWriteB => Phase::ReadBWriteA,
            Phase::ReadBWriteA => Phase::ReadAWriteB,
        }
    }

    /// Index of the bind group encoding this phase.
    pub fn group(self) -> usize {
        match self {
            Phase::ReadAWriteB => 0,
            Phase::ReadBWriteA => 1,
        }
    }

    /// Copy read by a pass using this phase (0 = A, 1 = B).
    pub fn read_index(self) -> usize {
        self.group()
    }

    /// Copy written by a pass using this phase.
    pub fn write_index(self) -> usize {
        1 - self.group()
    }
}

/// Tick counter plus the current phase.
///
/// Per tick the compute pass uses [`PingPong::phase`], then [`PingPong::advance`]
/// is called once, and the render pass uses the flipped phase, so it reads
/// the copy the compute pass has just written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingPong {
    tick: u64,
    phase: Phase,
}

impl PingPong {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        self.phase = self.phase.flip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_an_involution() {
        for p in [Phase::ReadAWriteB, Phase::ReadBWriteA] {
            assert_ne!(p.flip(), p);
            assert_eq!(p.flip().flip(), p);
        }
    }

    #[test]
    fn phase_matches_tick_parity() {
        let mut pp = PingPong::new();
        for _ in 0..10 {
            assert_eq!(pp.phase().group() as u64, pp.tick() % 2);
            pp.advance();
        }
    }

    #[test]
    fn a_phase_never_reads_what_it_writes() {
        for p in [Phase::ReadAWriteB, Phase::ReadBWriteA] {
            assert_ne!(p.read_index(), p.write_index());
        }
    }

    #[test]
    fn render_reads_the_buffer_compute_just_wrote() {
        let mut pp = PingPong::new();
        for _ in 0..64 {
            let compute = pp.phase();
            pp.advance();
            let render = pp.phase();
            assert_eq!(render.read_index(), compute.write_index());

            // The next compute pass writes elsewhere than where this render reads.
            let next_compute = pp.phase();
            assert_ne!(next_compute.write_index(), render.read_index());
        }
    }
}
