/// Converts wall-clock time into a number of fixed simulation steps.
///
/// Time is accumulated across calls; leftover time smaller than one step
/// carries over. When more than `max_steps` steps are due at once the excess
/// is dropped so a slow frame cannot snowball into ever longer catch-ups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepper {
    fixed_step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedStepper {
    pub fn new(fixed_step: f32, max_steps: u32) -> Self {
        Self {
            fixed_step,
            max_steps,
            accumulator: 0.0,
        }
    }

    /// Adds `elapsed` seconds and returns how many fixed steps should run now
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        if self.fixed_step <= 0.0 {
            return 0;
        }

        let mut steps = 0;
        while self.accumulator >= self.fixed_step && steps < self.max_steps {
            self.accumulator -= self.fixed_step;
            steps += 1;
        }

        if steps == self.max_steps && self.accumulator >= self.fixed_step {
            log::debug!(
                "dropping {:.4}s of simulation time after {} catch-up steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.fixed_step;
        }

        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        if self.fixed_step > 0.0 {
            self.accumulator / self.fixed_step
        } else {
            0.0
        }
    }

    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    /// Changes the step length, keeping the accumulated time
    pub fn set_fixed_step(&mut self, fixed_step: f32) {
        self.fixed_step = fixed_step;
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps;
    }

    /// Discards any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
