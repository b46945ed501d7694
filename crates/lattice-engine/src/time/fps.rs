/// Averages frame rate over fixed windows.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: f32,
    elapsed: f32,
    frames: u32,
}

impl FpsCounter {
    /// `window` is the averaging period in seconds.
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(f32::EPSILON),
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Records one frame. Returns the average when a window completes.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.elapsed += dt;
        self.frames += 1;

        if self.elapsed < self.window {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed;
        self.elapsed = 0.0;
        self.frames = 0;
        Some(fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
