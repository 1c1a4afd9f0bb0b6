pub mod logging;
pub mod notify;
pub mod realtime;
pub mod storage;
