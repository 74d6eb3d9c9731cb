pub mod fight;

pub use fight::{FightReport, FightSimulator, PlayedMove};
