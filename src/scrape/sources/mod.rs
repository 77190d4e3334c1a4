//! One adapter module per bank, grouped by nothing but name.
//!
//! JSON APIs: Amonatbonk, Arvand, Azizi Moliya, Matin.
//! Static HTML: NBT, Eskhata, Oriyonbonk, Humo, CBT, Finca, IBT,
//! Tejaratbank.
//! Rendered HTML: Imon, Spitamenbank, BRT, SSB, Tawhidbank.

pub mod amonatbonk;
pub mod arvand;
pub mod azizimoliya;
pub mod brt;
pub mod cbt;
pub mod eskhata;
pub mod finca;
pub mod humo;
pub mod ibt;
pub mod imon;
pub mod matin;
pub mod nbt;
pub mod oriyonbonk;
pub mod spitamenbank;
pub mod ssb;
pub mod tawhidbank;
pub mod tejaratbank;
