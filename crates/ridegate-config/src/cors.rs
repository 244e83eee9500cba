use std::env;

use crate::{Lookup, split_list};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Self {
        match lookup("ALLOWED_ORIGINS") {
            Some(raw) => Self {
                allowed_origins: split_list(&raw),
            },
            None => Self::default(),
        }
    }
}
