use crate::{CodegenError, CodegenResult};

/// Prefix reserved for the entries of the bundle itself (`_call_`, `_version_`)
pub const RESERVED_PREFIX: char = '_';

/// Whether `name` can be used as a method name in the generated object literal
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first == '$' || first == '_' || unicode_ident::is_xid_start(first))
        && chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// Checks a name that becomes a top level entry, or a namespace member, of the bundle
///
/// # Errors
///
/// Returns [`CodegenError::InvalidName`] if the name is not an identifier or
/// uses the reserved prefix
pub fn validate_name(name: &str) -> CodegenResult<()> {
    if !is_identifier(name) {
        return Err(CodegenError::InvalidName {
            name: name.into(),
            reason: "not a valid identifier".into(),
        });
    }

    if is_reserved(name) {
        return Err(CodegenError::InvalidName {
            name: name.into(),
            reason: format!("names starting with `{RESERVED_PREFIX}` are reserved"),
        });
    }

    Ok(())
}

/// Last path segment of a Rust type or fn item name with any generics removed,
/// e.g. `my_app::api::Greeter<u8>` -> `Greeter`
pub fn simple_type_name(full: &str) -> String {
    let mut base = String::with_capacity(full.len());
    let mut depth = 0usize;
    for c in full.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => base.push(c),
            _ => {}
        }
    }

    match base.rsplit_once("::") {
        Some((_, last)) => last.to_string(),
        None => base,
    }
}
