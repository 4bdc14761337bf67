/// Sizing parameters of the vertex table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    initial_capacity: usize,
    max_load_factor: f64,
}

impl TableConfig {
    pub const MIN_CAPACITY: usize = 8;
    /// Upper bound of the initial capacity. Tables grow past it on demand.
    pub const MAX_INITIAL_CAPACITY: usize = 1 << 16;
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

    /// The slot count derived from it is clamped to
    /// `MIN_CAPACITY..=MAX_INITIAL_CAPACITY`.
    pub fn initial_capacity(self, value: usize) -> Self {
        Self {
            initial_capacity: value,
            ..self
        }
    }

    /// Occupied plus tombstoned slots may fill at most this fraction of the
    /// table before it grows. Clamped to `0.1..=0.95`, NaN and infinities
    /// select the default.
    pub fn max_load_factor(self, value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.1, 0.95)
        } else {
            Self::DEFAULT_MAX_LOAD_FACTOR
        };

        Self {
            max_load_factor: value,
            ..self
        }
    }

    /// Number of slots actually allocated for the configured capacity.
    pub fn slot_count(&self) -> usize {
        self.initial_capacity
            .clamp(Self::MIN_CAPACITY, Self::MAX_INITIAL_CAPACITY)
            .next_power_of_two()
    }

    pub fn load_factor(&self) -> f64 {
        self.max_load_factor
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::MIN_CAPACITY,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_is_power_of_two() {
        assert_eq!(TableConfig::default().slot_count(), 8);
        assert_eq!(TableConfig::default().initial_capacity(0).slot_count(), 8);
        assert_eq!(TableConfig::default().initial_capacity(9).slot_count(), 16);
        assert_eq!(TableConfig::default().initial_capacity(64).slot_count(), 64);
    }

    #[test]
    fn slot_count_is_capped() {
        assert_eq!(
            TableConfig::default().initial_capacity(usize::MAX).slot_count(),
            TableConfig::MAX_INITIAL_CAPACITY
        );
        assert_eq!(
            TableConfig::default()
                .initial_capacity(TableConfig::MAX_INITIAL_CAPACITY + 1)
                .slot_count(),
            TableConfig::MAX_INITIAL_CAPACITY
        );
    }

    #[test]
    fn load_factor_is_clamped() {
        assert_eq!(TableConfig::default().max_load_factor(2.0).load_factor(), 0.95);
        assert_eq!(TableConfig::default().max_load_factor(0.0).load_factor(), 0.1);
        assert_eq!(
            TableConfig::default().max_load_factor(f64::NAN).load_factor(),
            TableConfig::DEFAULT_MAX_LOAD_FACTOR
        );
        assert_eq!(
            TableConfig::default()
                .max_load_factor(f64::INFINITY)
                .load_factor(),
            TableConfig::DEFAULT_MAX_LOAD_FACTOR
        );
    }
}
