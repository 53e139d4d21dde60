use tandem_engine::core::{App, AppControl, FrameCtx};
use tandem_engine::time::StepSchedule;

use crate::demos::Demo;
use crate::options::Options;

/// Drives one demo: builds it on the first frame, steps it on schedule and
/// redraws it in between.
pub struct Studio {
    options: Options,
    schedule: StepSchedule,
    demo: Option<Box<dyn Demo>>,
}

impl Studio {
    pub fn new(options: Options) -> Self {
        let schedule = StepSchedule::new(options.interval()).with_budget(options.step_budget());
        Self {
            options,
            schedule,
            demo: None,
        }
    }
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.demo.is_none() {
            let kind = self.options.demo;
            match kind.build(ctx.context(), ctx.surface_format(), self.options.seed) {
                Ok(demo) => {
                    log::info!("running `{}`", kind.name());
                    self.demo = Some(demo);
                }
                Err(e) => {
                    log::error!("failed to build `{}`: {e:#}", kind.name());
                    return AppControl::Exit;
                }
            }
        }
        let Some(demo) = self.demo.as_mut() else {
            return AppControl::Exit;
        };

        let schedule = &mut self.schedule;
        let mut finished = false;
        let control = ctx.present(|_, target| {
            if schedule.due() {
                demo.step(target)?;
                if schedule.exhausted() {
                    log::info!("step budget reached after {} steps", schedule.steps_taken());
                    finished = true;
                }
            } else {
                demo.redraw(target);
            }
            Ok(())
        });

        if finished && self.options.exit_when_done {
            ctx.runtime.exit();
        }
        control
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        if let Some(demo) = &self.demo {
            demo.destroy();
        }
    }
}
