use mle_util::MleError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("mle: {0}")]
    Mle(#[from] MleError),

    #[error("factory not found: {0}")]
    FactoryNotFound(String),

    #[error("factory already registered: name={name}, product={product}")]
    AlreadyRegistered {
        name: String,
        product: &'static str,
    },

    #[error("type mismatch: name={name}, expected={expected}, registered={registered}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        registered: &'static str,
    },
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
