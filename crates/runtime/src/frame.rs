use foundation::time::Time;

/// Upper bound on a single frame step (seconds), e.g. after a hidden tab resumes.
pub const DEFAULT_MAX_DT_S: f64 = 0.25;

/// Frame metadata handed to per-frame systems.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Elapsed wall-clock time since the previous frame (seconds).
    pub dt_s: f64,
    /// Host timestamp at the start of the frame.
    pub time: Time,
}

/// Turns host timestamps into frames with a wall-clock delta.
///
/// Animation advanced by `dt_s` runs at the same speed on any display
/// refresh rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameClock {
    last: Option<Time>,
    next_index: u64,
    max_dt_s: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DT_S)
    }
}

impl FrameClock {
    pub fn new(max_dt_s: f64) -> Self {
        Self {
            last: None,
            next_index: 0,
            max_dt_s: max_dt_s.max(0.0),
        }
    }

    /// Advances to `now`.
    ///
    /// The first tick has `dt_s == 0`. Deltas are clamped to
    /// `[0, max_dt_s]`, so a timestamp that goes backwards never rewinds.
    pub fn tick(&mut self, now: Time) -> Frame {
        let dt_s = match self.last {
            None => 0.0,
            Some(prev) => {
                let dt = now.since(prev);
                if dt.is_finite() {
                    dt.clamp(0.0, self.max_dt_s)
                } else {
                    0.0
                }
            }
        };
        self.last = Some(now);

        let frame = Frame {
            index: self.next_index,
            dt_s,
            time: now,
        };
        self.next_index = self.next_index.wrapping_add(1);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;
    use foundation::time::Time;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::default();
        let f = clock.tick(Time(12.0));
        assert_eq!(f.index, 0);
        assert_eq!(f.dt_s, 0.0);
        assert_eq!(f.time, Time(12.0));
    }

    #[test]
    fn delta_follows_wall_clock() {
        let mut clock = FrameClock::default();
        clock.tick(Time(1.0));
        let f = clock.tick(Time(1.1));
        assert_eq!(f.index, 1);
        assert!((f.dt_s - 0.1).abs() < 1e-12);
    }

    #[test]
    fn large_gaps_are_clamped() {
        let mut clock = FrameClock::new(0.25);
        clock.tick(Time(0.0));
        assert_eq!(clock.tick(Time(30.0)).dt_s, 0.25);
    }

    #[test]
    fn backwards_time_does_not_rewind() {
        let mut clock = FrameClock::default();
        clock.tick(Time(5.0));
        let f = clock.tick(Time(4.0));
        assert_eq!(f.dt_s, 0.0);
        assert_eq!(f.index, 1);
    }
}
