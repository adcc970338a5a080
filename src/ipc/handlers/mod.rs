pub mod attendance;
pub mod auth;
pub mod fees;
pub mod media;
pub mod notices;
pub mod reports;
pub mod results;
pub mod students;
pub mod subjects;
