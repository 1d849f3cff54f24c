use thiserror::Error;

/// CLI-level errors with stable exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] salter_core::ClientError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Client(err) if err.is_unauthorized() => 4,
            Self::Client(_) => 3,
            Self::Render(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salter_core::UpstreamError;

    #[test]
    fn unauthorized_gets_its_own_exit_code() {
        let err = CliError::from(salter_core::ClientError::from(
            UpstreamError::unauthorized(401),
        ));
        assert_eq!(err.exit_code(), 4);

        let err = CliError::from(salter_core::ClientError::from(UpstreamError::network(
            "down",
        )));
        assert_eq!(err.exit_code(), 3);
    }
}
