//! Domain layer: currency allow-list, rate normalization, cities, roles.
//!
//! This module contains the source-independent domain model: the
//! tracked-currency allow-list with label resolution, raw and
//! normalized rate shapes, the numeric normalizer shared by every
//! source adapter, the city directory, and actor roles.

pub mod actor;
pub mod city;
pub mod currency;
pub mod rate;
pub mod role;

pub use actor::Actor;
pub use city::{City, CityDirectory};
pub use currency::CurrencyCode;
pub use rate::{NormalizedRate, RawRate, normalize, parse_rate_value};
pub use role::Role;
