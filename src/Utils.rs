/// CSV and JSON export of a simulation session, pretty-printed tables
pub mod export;
/// terminal and file logging setup
pub mod logger;
