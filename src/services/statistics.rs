use crate::domain::outcome::CustomerOutcome;

/// Append-only observations of one simulation run.
///
/// Occupancy snapshots are taken for every arrival. Waiting and sojourn times
/// are appended once per terminated customer; a rejection contributes a pair
/// of zeros so the time sequences cover served, reneged and rejected alike.
#[derive(Debug, Default, Clone)]
pub struct StatisticsCollector {
    customers_in_queue: Vec<usize>,
    customers_in_system: Vec<usize>,
    admission_levels: Vec<usize>,
    waiting_times: Vec<f64>,
    sojourn_times: Vec<f64>,
    rejected: usize,
    served: usize,
    reneged: usize,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    // Occupancy found by an arrival, before its own request joins the pool.
    pub fn record_arrival(&mut self, in_queue: usize, in_system: usize) {
        self.customers_in_queue.push(in_queue);
        self.customers_in_system.push(in_system);
    }

    // Occupancy right after an admitted customer joined, the customer included.
    pub fn record_admission(&mut self, level: usize) {
        self.admission_levels.push(level);
    }

    pub fn record_rejection(&mut self) {
        self.record_termination(CustomerOutcome::Rejected, 0.0, 0.0);
    }

    pub fn record_termination(&mut self, outcome: CustomerOutcome, waiting: f64, sojourn: f64) {
        match outcome {
            CustomerOutcome::Rejected => self.rejected += 1,
            CustomerOutcome::Served => self.served += 1,
            CustomerOutcome::Reneged => self.reneged += 1,
        }
        self.waiting_times.push(waiting);
        self.sojourn_times.push(sojourn);
    }

    pub fn customers_in_queue(&self) -> &[usize] {
        &self.customers_in_queue
    }

    pub fn customers_in_system(&self) -> &[usize] {
        &self.customers_in_system
    }

    pub fn admission_levels(&self) -> &[usize] {
        &self.admission_levels
    }

    pub fn waiting_times(&self) -> &[f64] {
        &self.waiting_times
    }

    pub fn sojourn_times(&self) -> &[f64] {
        &self.sojourn_times
    }

    pub fn arrivals(&self) -> usize {
        self.customers_in_system.len()
    }

    pub fn admitted(&self) -> usize {
        self.admission_levels.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn served(&self) -> usize {
        self.served
    }

    pub fn reneged(&self) -> usize {
        self.reneged
    }
}
