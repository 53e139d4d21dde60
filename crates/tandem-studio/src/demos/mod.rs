//! Demo workloads, one per orchestrator shape.

mod heat;
mod life;
mod particles;

use anyhow::Result;
use clap::ValueEnum;
use tandem_engine::device::GpuContext;

/// One simulation the studio can drive.
pub trait Demo {
    /// Advances one step and draws the result into `target`.
    fn step(&mut self, target: &wgpu::TextureView) -> Result<()>;

    /// Draws the current state again without stepping.
    fn redraw(&self, target: &wgpu::TextureView);

    /// Releases GPU resources.
    fn destroy(&self);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum DemoKind {
    /// Game of Life drawn as instanced squares.
    Life,
    /// Heat diffusion blitted fullscreen straight from the storage buffer.
    #[value(alias = "frame2d")]
    Heat,
    /// Particle trails on the texture variant (Simulate -> Diffuse -> Paint).
    Particles,
}

impl DemoKind {
    pub fn name(self) -> &'static str {
        match self {
            DemoKind::Life => "life",
            DemoKind::Heat => "heat",
            DemoKind::Particles => "particles",
        }
    }

    pub fn build(
        self,
        ctx: &GpuContext,
        format: wgpu::TextureFormat,
        seed: u64,
    ) -> Result<Box<dyn Demo>> {
        Ok(match self {
            DemoKind::Life => Box::new(life::Life::new(ctx, format, seed)?),
            DemoKind::Heat => Box::new(heat::Heat::new(ctx, format)?),
            DemoKind::Particles => Box::new(particles::Particles::new(ctx, format, seed)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_value_names() {
        for kind in DemoKind::value_variants() {
            assert_eq!(DemoKind::from_str(kind.name(), false).unwrap(), *kind);
        }
    }

    #[test]
    fn frame2d_is_an_alias() {
        assert_eq!(DemoKind::from_str("frame2d", false).unwrap(), DemoKind::Heat);
        assert!(DemoKind::from_str("boids", false).is_err());
    }
}
