//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `invalid_request` with
//! `details: {field, code}` so clients can highlight the offending input.

use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, TaskId, TaskValidationError, UserValidationError,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        "missing_field",
        format!("missing required field: {field}"),
    )
}

pub(crate) fn map_task_validation_error(err: TaskValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

fn username_code(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyUsername => "empty_username",
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        UserValidationError::UsernameInvalidCharacters => "invalid_username",
        UserValidationError::EmptyId | UserValidationError::InvalidId => "invalid_user_id",
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let code = match &err {
        LoginValidationError::Username(inner) => username_code(inner),
        LoginValidationError::EmptyPassword => "empty_password",
        LoginValidationError::PasswordTooLong { .. } => "password_too_long",
    };
    field_error(err.field(), code, err.to_string())
}

/// Parse a task id taken from the request path.
pub(crate) fn parse_task_id(raw: &str) -> Result<TaskId, Error> {
    TaskId::new(raw).map_err(map_task_validation_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, LoginCredentials};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = missing_field_error(FieldName::new("text"));
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "missing required field: text");
        assert_eq!(detail(&err, "field"), Some("text"));
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    #[case("not-a-uuid", "id", "invalid_id")]
    #[case("", "id", "invalid_id")]
    fn bad_task_ids_are_rejected(#[case] raw: &str, #[case] field: &str, #[case] code: &str) {
        let err = parse_task_id(raw).expect_err("invalid id");
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some(code));
    }

    #[rstest]
    #[case("   ", "pw", "username", "empty_username")]
    #[case("ada lovelace", "pw", "username", "invalid_username")]
    #[case("ada", "", "password", "empty_password")]
    fn login_errors_carry_field_and_code(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .map_err(map_login_validation_error)
            .expect_err("invalid credentials");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some(code));
    }
}
