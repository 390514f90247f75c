//! Run persistence for callers that want a local record

pub mod run_log;
