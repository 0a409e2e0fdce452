pub use edugroup_models::TaskId;
pub use edugroup_models::tasks::{CreateTaskDto, TaskDetails, TaskStatus, UpdateTaskDto};
