pub mod checkin;
pub mod evaluation;
