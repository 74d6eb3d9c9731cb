pub mod constants;
pub mod ledger;
pub mod overlay;
pub mod resolution;
pub mod stance;
pub mod terminal;
pub mod zones;

pub use ledger::{CriticalHit, DamageLedger};
pub use overlay::{Overlay, RuntimeState};
pub use resolution::{estimate_force, resolve_contact, Contact};
pub use stance::{ControlState, Posture, Stance};
pub use terminal::{classify, classify_position, TerminalReason, Verdict};
pub use zones::{TargetHeight, Zone};
