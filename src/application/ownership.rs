use crate::domain::{DomainError, Principal};
use tracing::warn;
use uuid::Uuid;

/// Fails with `Forbidden` when the principal does not own the targeted
/// resource. `resource` names what was targeted, e.g. "bank account
/// details", and is only used in the error message.
pub fn require_owner(
    principal: &Principal,
    resource_owner_id: Uuid,
    resource: &str,
) -> Result<(), DomainError> {
    if principal.user_id != resource_owner_id {
        warn!(
            "User {} denied access to {} owned by {}",
            principal.user_id, resource, resource_owner_id
        );
        return Err(DomainError::Forbidden(format!(
            "The user is not allowed to access the {}.",
            resource
        )));
    }
    Ok(())
}
