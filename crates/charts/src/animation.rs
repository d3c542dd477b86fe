use foundation::time::Time;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseOutQuart,
    #[default]
    EaseInOutQuart,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => ease_in_out_quart(t),
        }
    }
}

pub fn ease_in_out_quart(t: f64) -> f64 {
    if t < 0.5 {
        8.0 * t.powi(4)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
    }
}

/// A fixed-length transition that starts on the first frame after `restart`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    duration_s: f64,
    easing: Easing,
    start: Option<Time>,
    pending: bool,
}

impl Animation {
    pub fn new(duration_s: f64, easing: Easing) -> Self {
        Self {
            duration_s: duration_s.max(0.0),
            easing,
            start: None,
            pending: false,
        }
    }

    /// Schedules the transition to begin on the next `progress` call.
    pub fn restart(&mut self) {
        self.pending = true;
    }

    /// Eased progress at `now`; 1.0 when idle or finished.
    pub fn progress(&mut self, now: Time) -> f64 {
        if self.pending {
            self.start = Some(now);
            self.pending = false;
        }
        let Some(start) = self.start else {
            return 1.0;
        };
        if self.duration_s <= 0.0 {
            return 1.0;
        }
        let linear = now.since(start) / self.duration_s;
        if linear >= 1.0 {
            self.start = None;
            return 1.0;
        }
        self.easing.apply(linear)
    }

    pub fn is_running(&self) -> bool {
        self.pending || self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Animation, Easing, ease_in_out_quart};
    use foundation::time::Time;

    #[test]
    fn ease_in_out_quart_endpoints() {
        assert_eq!(ease_in_out_quart(0.0), 0.0);
        assert_eq!(ease_in_out_quart(0.5), 0.5);
        assert_eq!(ease_in_out_quart(1.0), 1.0);
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in [Easing::Linear, Easing::EaseOutQuart, Easing::EaseInOutQuart] {
            let mut prev = easing.apply(0.0);
            for i in 1..=100 {
                let v = easing.apply(i as f64 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn animation_runs_for_its_duration() {
        let mut anim = Animation::new(1.0, Easing::Linear);
        assert_eq!(anim.progress(Time(0.0)), 1.0);
        assert!(!anim.is_running());

        anim.restart();
        assert!(anim.is_running());
        assert_eq!(anim.progress(Time(10.0)), 0.0);
        assert_eq!(anim.progress(Time(10.25)), 0.25);
        assert_eq!(anim.progress(Time(11.5)), 1.0);
        assert!(!anim.is_running());
    }

    #[test]
    fn easing_names_use_camel_case() {
        let easing: Easing = serde_json::from_str("\"easeInOutQuart\"").expect("parse");
        assert_eq!(easing, Easing::EaseInOutQuart);
    }
}
