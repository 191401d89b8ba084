//! Construction-order serial numbers for affordances.

/// Hands out increasing serials to the affordances of one run.  Serials
/// break ties when two affordances are otherwise equally attractive.
#[derive(Clone, Debug, Default)]
pub struct AffordanceSerialGenerator {
    next: u32,
}

impl AffordanceSerialGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_serial(&mut self) -> u32 {
        let serial = self.next;
        self.next += 1;
        serial
    }

    /// Number of serials issued so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}
