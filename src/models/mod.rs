pub mod attendance;
pub mod cell;
pub mod month;
pub mod result;
