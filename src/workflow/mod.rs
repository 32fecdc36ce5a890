pub mod course_flow;

pub use course_flow::CourseFlow;
