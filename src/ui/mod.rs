/// UI widgets
///
/// Presentation only: these functions render what the coordinator, history
/// store and toast queue expose. No state lives here and no transition is
/// triggered as a side effect of rendering.

pub mod screens;
pub mod toast;
