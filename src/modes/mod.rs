pub mod duel;

pub use duel::DuelMode;
