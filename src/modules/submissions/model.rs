pub use edugroup_models::submissions::{
    CreateCommentDto, CreateSubmissionDto, GradeSubmissionDto, SubmissionComment,
    SubmissionDetails, SubmissionFilterParams, SubmissionStatus,
};
pub use edugroup_models::SubmissionId;
