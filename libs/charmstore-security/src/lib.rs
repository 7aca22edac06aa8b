#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod acl;
pub mod authorization;

pub use acl::{Acl, EntityAcls, MembershipError, principals};
pub use authorization::{Authorization, AuthorizationBuilder};
