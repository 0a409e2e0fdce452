use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{
    AuthResponse, ErrorResponse, LoginRequest, MessageResponse, RegisterRequest,
};
use crate::modules::course_modules::model::{
    CourseModule, CreateModuleDto, EnrollStudentDto, ModuleDetail, ModuleWithStats,
    UpdateModuleDto,
};
use crate::modules::groups::model::{
    CreateGroupDto, GroupDetails, GroupWithMembers, ManageMembershipDto, MembershipAction,
    UpdateGroupDto,
};
use crate::modules::messages::model::{ConversationSummary, MessageWithParties, SendMessageDto};
use crate::modules::projects::model::{
    CreateProjectDto, CreateStepDto, Project, ProjectListItem, ProjectStatus, ProjectStep,
    ProjectWithSteps, UpdateProjectDto,
};
use crate::modules::submissions::model::{
    CreateCommentDto, CreateSubmissionDto, GradeSubmissionDto, SubmissionComment,
    SubmissionDetails, SubmissionFilterParams, SubmissionStatus,
};
use crate::modules::tasks::model::{CreateTaskDto, TaskDetails, TaskStatus, UpdateTaskDto};
use crate::modules::users::model::{User, UserRole, UserSummary};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_students,
        crate::modules::users::controller::get_user_by_id,
        crate::modules::course_modules::controller::get_modules,
        crate::modules::course_modules::controller::create_module,
        crate::modules::course_modules::controller::get_module_by_id,
        crate::modules::course_modules::controller::update_module,
        crate::modules::course_modules::controller::delete_module,
        crate::modules::course_modules::controller::enroll_student,
        crate::modules::course_modules::controller::unenroll_student,
        crate::modules::projects::controller::get_projects,
        crate::modules::projects::controller::create_project,
        crate::modules::projects::controller::get_project_by_id,
        crate::modules::projects::controller::update_project,
        crate::modules::projects::controller::delete_project,
        crate::modules::tasks::controller::get_tasks,
        crate::modules::tasks::controller::create_task,
        crate::modules::tasks::controller::get_task_by_id,
        crate::modules::tasks::controller::update_task,
        crate::modules::tasks::controller::delete_task,
        crate::modules::groups::controller::get_groups,
        crate::modules::groups::controller::create_group,
        crate::modules::groups::controller::get_group_by_id,
        crate::modules::groups::controller::update_group,
        crate::modules::groups::controller::delete_group,
        crate::modules::groups::controller::get_group_members,
        crate::modules::groups::controller::manage_membership,
        crate::modules::submissions::controller::get_submissions,
        crate::modules::submissions::controller::create_submission,
        crate::modules::submissions::controller::get_submission_by_id,
        crate::modules::submissions::controller::grade_submission,
        crate::modules::submissions::controller::delete_submission,
        crate::modules::submissions::controller::get_comments,
        crate::modules::submissions::controller::add_comment,
        crate::modules::messages::controller::send_message,
        crate::modules::messages::controller::get_received,
        crate::modules::messages::controller::get_sent,
        crate::modules::messages::controller::get_conversations,
        crate::modules::messages::controller::get_conversation,
        crate::modules::messages::controller::mark_as_read,
    ),
    components(
        schemas(
            ErrorResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            User,
            UserRole,
            UserSummary,
            CourseModule,
            ModuleWithStats,
            ModuleDetail,
            CreateModuleDto,
            UpdateModuleDto,
            EnrollStudentDto,
            Project,
            ProjectStatus,
            ProjectListItem,
            ProjectStep,
            ProjectWithSteps,
            CreateStepDto,
            CreateProjectDto,
            UpdateProjectDto,
            TaskDetails,
            TaskStatus,
            CreateTaskDto,
            UpdateTaskDto,
            GroupDetails,
            GroupWithMembers,
            CreateGroupDto,
            UpdateGroupDto,
            ManageMembershipDto,
            MembershipAction,
            SubmissionDetails,
            SubmissionStatus,
            SubmissionComment,
            SubmissionFilterParams,
            CreateSubmissionDto,
            GradeSubmissionDto,
            CreateCommentDto,
            MessageWithParties,
            SendMessageDto,
            ConversationSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Users", description = "User directory"),
        (name = "Modules", description = "Course modules and enrolment"),
        (name = "Projects", description = "Projects and their ordered steps"),
        (name = "Tasks", description = "Tasks within a module"),
        (name = "Groups", description = "Student groups and membership"),
        (name = "Submissions", description = "Deliverables, grading and review comments"),
        (name = "Messages", description = "Direct messages and conversations"),
        (name = "Health", description = "Service status")
    ),
    info(
        title = "EduGroupManager API",
        version = "0.1.0",
        description = "Group coursework management: modules, projects, tasks, student groups, submissions and messaging.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
