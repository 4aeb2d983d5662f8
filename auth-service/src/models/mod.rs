pub mod credential;
pub mod membership;
pub mod role;
pub mod verification;

pub use credential::{Credential, CredentialHistory};
pub use membership::{Membership, ResourceType};
pub use role::{Permission, Role, RolePermission};
pub use verification::{VerificationKind, VerificationRecord};
