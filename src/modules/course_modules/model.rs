pub use edugroup_models::modules::{
    CourseModule, CreateModuleDto, EnrollStudentDto, ModuleDetail, ModuleWithStats,
    UpdateModuleDto,
};
pub use edugroup_models::{ModuleId, UserId};
