use serde::Serialize;

/// A phase that counts time and can be suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivePhase {
    Working,
    Resting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Working,
    Resting,
    /// Timer suspended; `suspended` is the phase resume returns to.
    Paused { suspended: ActivePhase },
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Working => "working",
            Phase::Resting => "resting",
            Phase::Paused { .. } => "paused",
        }
    }

    /// Durations may only be edited while nothing is counting.
    pub fn is_editable(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Paused { .. })
    }

    pub fn active(&self) -> Option<ActivePhase> {
        match self {
            Phase::Working => Some(ActivePhase::Working),
            Phase::Resting => Some(ActivePhase::Resting),
            Phase::Idle | Phase::Paused { .. } => None,
        }
    }
}

impl From<ActivePhase> for Phase {
    fn from(p: ActivePhase) -> Self {
        match p {
            ActivePhase::Working => Phase::Working,
            ActivePhase::Resting => Phase::Resting,
        }
    }
}

/// Which duration the adjust gesture and presets edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EditTarget {
    #[default]
    Work,
    Rest,
}

impl EditTarget {
    pub fn toggled(self) -> Self {
        match self {
            EditTarget::Work => EditTarget::Rest,
            EditTarget::Rest => EditTarget::Work,
        }
    }
}
