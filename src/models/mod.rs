mod subscription;

pub use subscription::*;
