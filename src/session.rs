use thiserror::Error;

use crate::weightings::CourseId;

pub const TOKEN_ENV: &str = "WEIGHTINGS_API_TOKEN";
pub const COURSE_ENV: &str = "WEIGHTINGS_COURSE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0} not set")]
    MissingToken(&'static str),
}

/// Authenticated account context: the token sent with every request and the
/// course the weighting screens operate on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: String,
    pub active_course: Option<CourseId>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            active_course: None,
        }
    }

    pub fn with_course(mut self, course: CourseId) -> Self {
        self.active_course = Some(course);
        self
    }

    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, SessionError> {
        let token = var(TOKEN_ENV).ok_or(SessionError::MissingToken(TOKEN_ENV))?;
        let active_course = var(COURSE_ENV).and_then(|c| c.trim().parse().ok());
        Ok(Self {
            token,
            active_course,
        })
    }

    pub fn select_course(&mut self, course: CourseId) {
        self.active_course = Some(course);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_typed_error() {
        let err = Session::from_vars(|_| None).unwrap_err();
        assert_eq!(err, SessionError::MissingToken(TOKEN_ENV));
        assert_eq!(err.to_string(), "WEIGHTINGS_API_TOKEN not set");
    }

    #[test]
    fn test_course_parsed_when_present() {
        let session = Session::from_vars(|key| match key {
            TOKEN_ENV => Some("tok".into()),
            COURSE_ENV => Some(" 7 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(session, Session::new("tok").with_course(7));
    }

    #[test]
    fn test_unparseable_course_is_ignored() {
        let session = Session::from_vars(|key| match key {
            TOKEN_ENV => Some("tok".into()),
            _ => Some("physics".into()),
        })
        .unwrap();
        assert_eq!(session.active_course, None);
    }
}
