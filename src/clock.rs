use std::time::Duration;
use web_time::*;

pub trait Clock {
    /// Block until a `1 / fps` second frame has passed since the previous
    /// tick. Returns the time since the previous tick.
    fn tick(&mut self, fps: u32) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

pub fn frame_budget(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

// How long to sleep so that a frame that took `elapsed` fills `budget`
fn remaining(budget: Duration, elapsed: Duration) -> Option<Duration> {
    budget.checked_sub(elapsed).filter(|d| !d.is_zero())
}

pub struct FrameClock {
    prev_time: Instant,
}

impl FrameClock {
    pub fn new() -> FrameClock {
        FrameClock {
            prev_time: Instant::now(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::new()
    }
}

impl Clock for FrameClock {
    fn tick(&mut self, fps: u32) -> Duration {
        if let Some(rest) = remaining(frame_budget(fps), self.prev_time.elapsed()) {
            std::thread::sleep(rest);
        }
        let cur_time = Instant::now();
        let delta = cur_time - self.prev_time;
        self.prev_time = cur_time;
        delta
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Clock that never blocks and records what it was asked to do.
    #[derive(Default)]
    pub struct ManualClock {
        pub ticks: u32,
        pub sleeps: Vec<Duration>,
    }

    impl Clock for ManualClock {
        fn tick(&mut self, fps: u32) -> Duration {
            self.ticks += 1;
            frame_budget(fps)
        }

        fn sleep(&mut self, duration: Duration) {
            self.sleeps.push(duration);
        }
    }
}
