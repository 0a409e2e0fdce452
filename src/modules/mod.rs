pub mod auth;
pub mod course_modules;
pub mod groups;
pub mod messages;
pub mod projects;
pub mod submissions;
pub mod tasks;
pub mod users;
