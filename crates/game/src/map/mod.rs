mod course;
mod objects;

pub use course::{Landmark, TestCourse};
pub use objects::{MapObject, MapObjectKind};
