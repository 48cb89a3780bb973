/// SETTINGS / NETWORK document loader with line and column error reporting
pub mod load_from_file;
/// simplelog initialization for binaries
pub mod logger;
