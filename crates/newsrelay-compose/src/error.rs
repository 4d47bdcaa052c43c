use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("synonym list for '{key}' is empty")]
    EmptySynonymList { key: String },

    #[error("{kind} pool is empty")]
    EmptyAffixPool { kind: &'static str },

    #[error("probability {value} for {name} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("post body is empty")]
    EmptyBody,

    #[error("limit of {limit} characters cannot hold the mandatory parts ({required})")]
    LimitTooSmall { limit: usize, required: usize },

    #[error("post of {length} characters exceeds limit of {limit}")]
    TooLong { length: usize, limit: usize },
}
