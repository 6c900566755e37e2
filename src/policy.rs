use uuid::Uuid;

use crate::error::AppError;

/// What the caller is trying to do to a resource, used only to phrase the
/// rejection message.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    const fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "edit",
            Self::Delete => "delete",
        }
    }
}

/// Single ownership check used by every mutating handler: the caller may
/// only act on records attributed to themselves. Evaluated against the
/// already-identified owner of the resource.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when `actor` does not own the resource.
pub fn ensure_owner(
    actor: Uuid,
    owner: Uuid,
    action: Action,
    resource: &str,
) -> Result<(), AppError> {
    if actor == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You can only {} your own {resource}.",
            action.verb()
        )))
    }
}
