/// Terminal state of a simulated customer. Set exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerOutcome {
    Rejected,
    Served,
    Reneged,
}
