pub mod client;
pub mod error;
pub mod queries;
pub mod report;
pub mod source;
pub mod ss58;

pub use client::*;
pub use error::*;
pub use queries::account::{get_balance, RelayChainClient};
pub use queries::identity::{get_display_name, PeopleChainClient};
pub use queries::members::{get_members, CollectivesChainClient};
pub use report::build_report;
pub use source::{AccountSource, IdentitySource, MembershipSource};
