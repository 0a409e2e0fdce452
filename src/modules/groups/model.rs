pub use edugroup_models::groups::{
    CreateGroupDto, GroupDetails, GroupWithMembers, ManageMembershipDto, MembershipAction,
    UpdateGroupDto,
};
pub use edugroup_models::{GroupId, UserId, UserSummary};
