use http::StatusCode;
use forward_auth::CoordinationError;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Implementation for CoordinationError to map variants to appropriate status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::InvalidPassword => StatusCode::UNAUTHORIZED,
                CoordinationError::Utils(_) => StatusCode::BAD_REQUEST,
                CoordinationError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// Template rendering failures are server errors
impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::error!("Failed to render page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forward_auth::{TokenError, UtilError};

    #[test]
    fn test_invalid_password_is_unauthorized() {
        let result: Result<(), CoordinationError> = Err(CoordinationError::InvalidPassword);

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, message)) = response_error {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid password");
        }
    }

    #[test]
    fn test_utils_error_is_bad_request() {
        let result: Result<(), CoordinationError> = Err(CoordinationError::Utils(
            UtilError::Cookie("Failed to parse cookie".to_string()),
        ));

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, _)) = response_error {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_token_error_is_internal() {
        let result: Result<(), CoordinationError> = Err(CoordinationError::Token(
            TokenError::Crypto("Invalid HMAC key".to_string()),
        ));

        let response_error = result.into_response_error();

        assert!(response_error.is_err());
        if let Err((status, _)) = response_error {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_success_case() {
        let result: Result<String, CoordinationError> = Ok("Success".to_string());

        let response_error = result.into_response_error();

        assert!(response_error.is_ok());
        assert_eq!(response_error.unwrap(), "Success");
    }
}
