//! Approval gateway implementations

mod auto;
mod channel;
mod console;

pub use auto::AutoApprovalGateway;
pub use channel::{ChannelApprovalGateway, PendingApproval, ReviewerResponse};
pub use console::ConsoleApprovalGateway;
