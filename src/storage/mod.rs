pub mod atomic;

pub use atomic::lock::FileLock;
pub use atomic::AtomicFile;
