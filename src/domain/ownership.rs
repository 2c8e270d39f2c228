use uuid::Uuid;

use crate::{entities::blog::Blog, errors::AppError};

/// Whether a caller may remove a blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    NotFound,
    Forbidden,
    Allowed,
}

pub fn check_ownership(blog: Option<&Blog>, caller_id: &Uuid) -> Ownership {
    match blog {
        None => Ownership::NotFound,
        Some(blog) if blog.user_id == *caller_id => Ownership::Allowed,
        Some(_) => Ownership::Forbidden,
    }
}

impl Ownership {
    pub fn is_allowed(self) -> bool {
        self == Ownership::Allowed
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Ownership::Allowed => Ok(()),
            Ownership::Forbidden => Err(AppError::ForbiddenAccess),
            Ownership::NotFound => Err(AppError::NotFound("blog not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn blog_owned_by(owner: Uuid) -> Blog {
        Blog {
            id: Uuid::new_v4(),
            title: "Type wars".into(),
            author: "Robert C. Martin".into(),
            url: "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html".into(),
            likes: 2,
            user_id: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_blog_is_not_found() {
        let outcome = check_ownership(None, &Uuid::new_v4());
        assert_eq!(outcome, Ownership::NotFound);
        assert!(matches!(outcome.into_result(), Err(AppError::NotFound(_))));
    }

    #[test]
    fn owner_is_allowed() {
        let owner = Uuid::new_v4();
        let blog = blog_owned_by(owner);

        let outcome = check_ownership(Some(&blog), &owner);
        assert!(outcome.is_allowed());
        assert!(outcome.into_result().is_ok());
    }

    #[test]
    fn someone_else_is_forbidden() {
        let blog = blog_owned_by(Uuid::new_v4());

        let outcome = check_ownership(Some(&blog), &Uuid::new_v4());
        assert_eq!(outcome, Ownership::Forbidden);
        assert!(matches!(outcome.into_result(), Err(AppError::ForbiddenAccess)));
    }
}
