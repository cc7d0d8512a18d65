use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    #[serde(rename = "supabase")]
    Supabase,
    #[serde(rename = "s3")]
    S3,
    #[serde(rename = "memory")]
    Memory,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(Provider::Supabase),
            "s3" => Ok(Provider::S3),
            "memory" => Ok(Provider::Memory),
            other => Err(format!("unknown storage provider '{}'", other)),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Supabase => "supabase",
            Provider::S3 => "s3",
            Provider::Memory => "memory",
        };
        f.write_str(name)
    }
}
