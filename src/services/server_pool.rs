use std::collections::VecDeque;

pub type CustomerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Granted,
    Queued,
}

/// `n` identical servers in front of an unbounded FIFO wait list.
#[derive(Debug)]
pub struct ServerPool {
    capacity: usize,
    busy: usize,
    wait_list: VecDeque<CustomerId>,
}

impl ServerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            busy: 0,
            wait_list: VecDeque::new(),
        }
    }

    pub fn busy_servers(&self) -> usize {
        self.busy
    }

    pub fn waiting_count(&self) -> usize {
        self.wait_list.len()
    }

    pub fn occupancy(&self) -> usize {
        self.busy + self.wait_list.len()
    }

    pub fn request(&mut self, customer: CustomerId) -> RequestOutcome {
        if self.busy < self.capacity {
            self.busy += 1;
            RequestOutcome::Granted
        } else {
            self.wait_list.push_back(customer);
            RequestOutcome::Queued
        }
    }

    pub fn withdraw(&mut self, customer: CustomerId) -> bool {
        match self.wait_list.iter().position(|waiting| *waiting == customer) {
            Some(index) => {
                self.wait_list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Frees one server. If someone is waiting, the server passes straight to
    /// the head of the wait list and that customer is returned.
    pub fn release(&mut self) -> Option<CustomerId> {
        debug_assert!(self.busy > 0, "release called on an idle pool");
        match self.wait_list.pop_front() {
            Some(next) => Some(next),
            None => {
                self.busy = self.busy.saturating_sub(1);
                None
            }
        }
    }
}
