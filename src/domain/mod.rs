pub mod notice;
pub mod photo;

pub use notice::*;
pub use photo::*;
