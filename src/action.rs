/// Every effect a keystroke can have, produced by `App::map_key` and
/// consumed by `App::dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ToggleSort,
    /// Open the filter prompt with an empty buffer.
    EnterFilterMode,
    /// Apply the prompt buffer as the complete replacement filter.
    ApplyFilter,
    /// Close the prompt keeping the previously applied filter.
    CancelPrompt,
    UpdateBuffer(String),
    /// Open the kill prompt (pid digits).
    EnterKillMode,
    /// Parse the buffer as a pid and request SIGTERM delivery.
    SubmitKill,
    RaiseRefresh,
    LowerRefresh,
    /// Immediate resample outside the tick cadence.
    Refresh,
    ToggleHelp,
    None,
}
