//! Permission adapters

mod host;

pub use host::HostMicrophone;
