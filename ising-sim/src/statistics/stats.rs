/// Running mean of `x^power` for a scalar series.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub count: usize,
    pub aggregate: f64,
    pub power: i32,
}

impl Statistics {
    pub fn new(power: i32) -> Self {
        Self {
            count: 0,
            aggregate: 0.0,
            power,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.aggregate += if self.power == 1 {
            value
        } else {
            value.powi(self.power)
        };
    }

    /// Mean of the accumulated powers, or 0 when nothing was recorded.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.aggregate / self.count as f64
    }
}
