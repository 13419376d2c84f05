mod city;
mod college;
mod course;

pub use city::{City, NewCity};
pub use college::{College, NewCollege};
pub use course::{Course, NewCourse};

use uuid::Uuid;

/// `{id, name}` projection used when resolving references
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
}
