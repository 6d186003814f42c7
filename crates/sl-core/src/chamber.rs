use core::fmt;

/// What the chamber was doing, kept so a paused operation can be resumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChamberMacroState {
    SluicingUp,
    SluicingDown,
    AllowingEntry,
    AllowingExit,
    #[default]
    Waiting,
}

impl ChamberMacroState {
    pub fn is_sluicing(self) -> bool {
        matches!(
            self,
            ChamberMacroState::SluicingUp | ChamberMacroState::SluicingDown
        )
    }
}

impl fmt::Display for ChamberMacroState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChamberMacroState::SluicingUp => "sluicing-up",
            ChamberMacroState::SluicingDown => "sluicing-down",
            ChamberMacroState::AllowingEntry => "allowing-entry",
            ChamberMacroState::AllowingExit => "allowing-exit",
            ChamberMacroState::Waiting => "waiting",
        };
        f.write_str(name)
    }
}
