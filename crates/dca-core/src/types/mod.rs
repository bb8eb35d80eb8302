//! Domain types for the DCA engine.

mod date;
mod day_index;

pub use date::Date;
pub use day_index::{epoch, DayIndex};
