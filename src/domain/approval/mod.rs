//! Approval domain: human review of drafted answers

mod gateway;
mod outcome;

pub use gateway::ApprovalGateway;
pub use outcome::{
    ApprovalOutcome, ApprovalRequest, INCORPORATE_FEEDBACK_OPTION, RejectOption,
    TAKE_OVER_OPTION, TAKEOVER_SENTINEL, default_reject_options,
};

#[cfg(test)]
pub use gateway::mock;
