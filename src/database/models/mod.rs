pub mod attachment;
pub mod blog;
pub mod design;
pub mod organization;
pub mod profile;
pub mod project;
pub mod resource;
pub mod role;
pub mod task;
pub mod waitlist;

pub use attachment::{Attachment, NewAttachment};
pub use blog::{BlogPost, NewBlogPost};
pub use design::{Design, DesignInput};
pub use organization::{Membership, NewMembership, NewOrganization, Organization};
pub use profile::{NewProfile, Profile};
pub use project::{NewPhase, NewProject, Phase, Project, ProjectStatus};
pub use resource::{NewProjectUrl, NewSecret, ProjectUrl, Secret};
pub use role::{NewRole, Role};
pub use task::{NewTask, Task, TaskMove, TaskStatus};
pub use waitlist::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus};
