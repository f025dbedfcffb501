//! The mount-option surface.
//!
//! Options arrive as `-o key=value[,key=value...]` token lists. The key set
//! is a closed enumeration: anything unrecognized is a parse error, fatal
//! before the filesystem attaches. Booleans accept exactly `true` or
//! `false` - not `1`, not `yes`, not `True`.

use std::str::FromStr;

use mosaicfs_branch::{BranchError, BranchSet};

use crate::config::{ConfigBuilder, ConfigError};

/// A mount-option parse failure. Always fatal pre-mount.
#[derive(Debug, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option '{key}'")]
    UnknownKey { key: String },

    #[error("option '{key}': expected 'true' or 'false', got '{value}'")]
    InvalidBool { key: String, value: String },

    #[error("option '{key}': invalid numeric value '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("option '{key}': invalid value '{value}'")]
    InvalidEnum { key: String, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Branch(#[from] BranchError),
}

/// Apply a comma-separated `-o` option list to the builder.
pub fn apply_option_list(builder: &mut ConfigBuilder, list: &str) -> Result<(), OptionError> {
    for token in list.split(',').filter(|t| !t.is_empty()) {
        apply_option(builder, token)?;
    }
    Ok(())
}

/// Apply a single `key` or `key=value` token to the builder.
pub fn apply_option(builder: &mut ConfigBuilder, token: &str) -> Result<(), OptionError> {
    match token.split_once('=') {
        None => apply_flag(builder, token),
        Some((key, value)) => apply_kv(builder, key, value),
    }
}

/// Bare flags (no `=value` part).
fn apply_flag(builder: &mut ConfigBuilder, key: &str) -> Result<(), OptionError> {
    match key {
        "direct_io" => builder.direct_io = true,
        "hard_remove" => builder.hard_remove = true,
        "kernel_cache" => builder.kernel_cache = true,
        "auto_cache" => builder.auto_cache = true,
        _ => {
            return Err(OptionError::UnknownKey {
                key: key.to_string(),
            })
        }
    }
    Ok(())
}

fn apply_kv(builder: &mut ConfigBuilder, key: &str, value: &str) -> Result<(), OptionError> {
    if let Some((prefix, name)) = key.split_once('.') {
        return match prefix {
            "func" => Ok(builder.set_func_policy(name, value)?),
            "category" => Ok(builder.set_category_policy(name, value)?),
            _ => Err(OptionError::UnknownKey {
                key: key.to_string(),
            }),
        };
    }

    match key {
        "minfreespace" => builder.min_free_space = Some(parse_u64(key, value)?),
        "moveonenospc" => builder.move_on_enospc = parse_bool(key, value)?,
        "dropcacheonclose" => builder.drop_cache_on_close = parse_bool(key, value)?,
        "symlinkify" => builder.symlinkify = parse_bool(key, value)?,
        "symlinkify_timeout" => builder.symlinkify_timeout = Some(parse_u64(key, value)?),
        "nullrw" => builder.nullrw = parse_bool(key, value)?,
        "ignorepponrename" => builder.ignore_pp_on_rename = parse_bool(key, value)?,
        "security_capability" => builder.security_capability = Some(parse_bool(key, value)?),
        "link_cow" => builder.link_cow = parse_bool(key, value)?,
        "xattr" => builder.xattr = parse_enum(key, value)?,
        "statfs" => builder.statfs = parse_enum(key, value)?,
        "statfs_ignore" => builder.statfs_ignore = parse_enum(key, value)?,
        "hard_remove" => builder.hard_remove = parse_bool(key, value)?,
        "direct_io" => builder.direct_io = parse_bool(key, value)?,
        "entry_timeout" => builder.entry_timeout = Some(parse_f64(key, value)?),
        "negative_timeout" => builder.negative_timeout = Some(parse_f64(key, value)?),
        "attr_timeout" => builder.attr_timeout = Some(parse_f64(key, value)?),
        "ac_attr_timeout" => builder.ac_attr_timeout = Some(parse_f64(key, value)?),
        _ => {
            return Err(OptionError::UnknownKey {
                key: key.to_string(),
            })
        }
    }
    Ok(())
}

/// Strict boolean parse: exactly `true` or `false`.
fn parse_bool(key: &str, value: &str) -> Result<bool, OptionError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, OptionError> {
    u64::from_str(value).map_err(|_| OptionError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, OptionError> {
    f64::from_str(value)
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| OptionError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_enum<T: FromStr>(key: &str, value: &str) -> Result<T, OptionError> {
    T::from_str(value).map_err(|_| OptionError::InvalidEnum {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Derive the presentation fsname: strip the path prefix common to every
/// branch (at a `/` boundary) and join the remainders with `:`.
pub fn derive_fsname(branches: &BranchSet) -> String {
    let paths: Vec<String> = branches
        .iter()
        .map(|b| b.path().to_string_lossy().into_owned())
        .collect();

    let mut prefix = paths[0].len();
    for path in &paths[1..] {
        prefix = prefix.min(
            path.bytes()
                .zip(paths[0].bytes())
                .take_while(|(a, b)| a == b)
                .count(),
        );
    }
    // Back off to a separator boundary so components are never split.
    let boundary = paths[0].as_bytes()[..prefix]
        .iter()
        .rposition(|&b| b == b'/')
        .map_or(0, |i| i + 1);

    paths
        .iter()
        .map(|p| &p[boundary..])
        .collect::<Vec<_>>()
        .join(":")
}
