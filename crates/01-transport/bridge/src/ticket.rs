use std::fmt;

/// Sequence number pairing a result with the decision it answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl Ticket {
    pub(crate) fn next(self) -> Ticket {
        Ticket(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value travelling through a slot together with its ticket.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticketed<T> {
    pub ticket: Ticket,
    pub payload: T,
}
