pub use edugroup_models::projects::{
    CreateProjectDto, CreateStepDto, Project, ProjectListItem, ProjectStatus, ProjectStep,
    ProjectWithSteps, UpdateProjectDto,
};
pub use edugroup_models::{ProjectId, StepId};
