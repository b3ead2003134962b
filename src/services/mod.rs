// Business logic services
// Eligibility pipeline, membership lookups, mail delivery, exclusion list

pub mod email;
pub mod exclusion_list;
pub mod membership;
pub mod notification_dispatcher;

pub use email::{EmailService, MailSender};
pub use exclusion_list::{ExclusionList, PropertiesStore};
pub use membership::{GithubMembershipChecker, MembershipChecker};
pub use notification_dispatcher::{Eligibility, NotificationDispatcher, NotifyRequest};
