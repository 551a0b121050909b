use serde::Serialize;

/// Option/share counts every strategy table is evaluated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuantitySchedule(Vec<u32>);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("quantity schedule is empty")]
    Empty,
    #[error("quantity must be positive")]
    ZeroQuantity,
    #[error("quantities must be strictly ascending: {previous} then {next}")]
    NotAscending { previous: u32, next: u32 },
    #[error("step must be positive")]
    ZeroStep,
}

impl QuantitySchedule {
    pub const DEFAULT_START: u32 = 1000;
    pub const DEFAULT_END: u32 = 10_000;
    pub const DEFAULT_STEP: u32 = 500;

    pub fn new(quantities: Vec<u32>) -> Result<Self, ScheduleError> {
        if quantities.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if quantities.contains(&0) {
            return Err(ScheduleError::ZeroQuantity);
        }
        if let Some(w) = quantities.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ScheduleError::NotAscending {
                previous: w[0],
                next: w[1],
            });
        }
        Ok(QuantitySchedule(quantities))
    }

    /// `start, start + step, ...` up to and including `end`
    pub fn stepped(start: u32, end: u32, step: u32) -> Result<Self, ScheduleError> {
        if step == 0 {
            return Err(ScheduleError::ZeroStep);
        }
        Self::new((start..=end).step_by(step as usize).collect())
    }

    pub fn quantities(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for QuantitySchedule {
    /// 1000, 1500, ... 10000
    fn default() -> Self {
        let quantities = (Self::DEFAULT_START..=Self::DEFAULT_END)
            .step_by(Self::DEFAULT_STEP as usize)
            .collect();
        QuantitySchedule(quantities)
    }
}
