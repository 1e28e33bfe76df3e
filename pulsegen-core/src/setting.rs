/// Bounded integer setting controlled by a rotary encoder.
///
/// The value is always within `[min, max]`; every write goes through
/// [`set()`](Setting::set), which clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setting {
    value: i32,
    min: i32,
    max: i32,
}

impl Setting {
    /// Create a setting. `value` is clamped into `[min, max]`.
    pub const fn new(value: i32, min: i32, max: i32) -> Self {
        let value = if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        };
        Self { value, min, max }
    }

    /// Current value, within `[min, max]`.
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Clamp `candidate` into this setting's range without storing it.
    pub fn clamp(&self, candidate: i32) -> i32 {
        candidate.clamp(self.min, self.max)
    }

    /// Store `candidate`, clamped. Returns `true` if the stored value changed.
    pub fn set(&mut self, candidate: i32) -> bool {
        let clamped = self.clamp(candidate);
        let changed = clamped != self.value;
        self.value = clamped;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_initial_value() {
        assert_eq!(Setting::new(50, 1, 10).value(), 10);
        assert_eq!(Setting::new(-3, 1, 10).value(), 1);
        assert_eq!(Setting::new(5, 1, 10).value(), 5);
    }

    #[test]
    fn set_clamps_and_reports_change() {
        let mut setting = Setting::new(10, 1, 10);
        assert!(!setting.set(15));
        assert_eq!(setting.value(), 10);

        assert!(setting.set(0));
        assert_eq!(setting.value(), 1);

        assert!(setting.set(7));
        assert!(!setting.set(7));
    }
}
