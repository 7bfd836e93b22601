use router_codec::Decision;

/// Driver state machine; one iteration always returns to `AwaitingDecision`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Polling the bridge for the next decision.
    AwaitingDecision,
    /// Control inputs for `Decision` are driven; the edge has not been taken.
    Acting(Decision),
    /// No decision arrived; the device advances with its previous inputs.
    IdleTick,
}

impl DriverState {
    pub fn name(&self) -> &'static str {
        match self {
            DriverState::AwaitingDecision => "awaiting-decision",
            DriverState::Acting(_) => "acting",
            DriverState::IdleTick => "idle-tick",
        }
    }
}
