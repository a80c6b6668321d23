// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Default names under which component members find their dependencies.
//!
//! A member without an explicitly configured name is looked up as `env/<owner>/<member>`, where
//! setters contribute their property name instead of the method name:
//!
//! ```
//! use switchboard_inject::naming;
//!
//! assert_eq!(naming::member_name("app::Frontend", "pool"), "env/app::Frontend/pool");
//! assert_eq!(naming::member_name("app::Frontend", "set_pool"), "env/app::Frontend/pool");
//! assert_eq!(naming::member_name("app::Frontend", "setPool"), "env/app::Frontend/pool");
//! assert_eq!(naming::explicit_name("jdbc/Orders"), "env/jdbc/Orders");
//! ```

use std::borrow::Cow;

/// The prefix of every name in a component namespace.
pub const ENV_PREFIX: &str = "env/";

/// The name of an explicitly named reference within a component namespace.
///
/// Names already carrying [`ENV_PREFIX`] are returned unchanged.
#[must_use]
pub fn explicit_name(name: &str) -> String {
    if name.starts_with(ENV_PREFIX) {
        name.to_owned()
    } else {
        format!("{ENV_PREFIX}{name}")
    }
}

/// The default name for the field `field` of `owner`.
#[must_use]
pub fn field_name(owner: &str, field: &str) -> String {
    format!("{ENV_PREFIX}{owner}/{field}")
}

/// The default name for a member of `owner`, treating mutator-style names as setters.
#[must_use]
pub fn member_name(owner: &str, member: &str) -> String {
    match setter_property(member) {
        Some(property) => field_name(owner, &property),
        None => field_name(owner, member),
    }
}

/// The property a mutator-style method name assigns, or `None` for other names.
///
/// `set_pool` yields `pool` and `setPool` yields `pool`. A property starting with two uppercase
/// letters keeps its case, so `setURL` yields `URL`.
#[must_use]
pub fn setter_property(method: &str) -> Option<Cow<'_, str>> {
    let rest = method.strip_prefix("set")?;

    if let Some(property) = rest.strip_prefix('_') {
        return (!property.is_empty()).then_some(Cow::Borrowed(property));
    }

    let mut chars = rest.chars();
    let first = chars.next().filter(char::is_ascii_uppercase)?;
    if chars.next().is_some_and(|second| second.is_ascii_uppercase()) {
        return Some(Cow::Borrowed(rest));
    }

    let mut property = String::with_capacity(rest.len());
    property.push(first.to_ascii_lowercase());
    property.push_str(&rest[first.len_utf8()..]);
    Some(Cow::Owned(property))
}
