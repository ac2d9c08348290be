//! URI resolution: template override, path substitution and base joining.

use battery_core::exception::{Error, Result};
use battery_core::marshaller::MarshalContext;
use battery_core::metadata::{MetadataKind, RpcDeclaration, get_mapped_members, get_member_metadata};
use battery_core::types::{MappedObject, ValueRef};

use crate::request::encode_component;

/// Resolves the request URI of `object`.
pub(crate) fn resolve_uri(
	base_uri: Option<&str>,
	object: &dyn MappedObject,
	declaration: &RpcDeclaration,
	marshal: &MarshalContext<'_>,
) -> Result<String> {
	let template = match uri_override(object, marshal)? {
		Some(uri) => uri,
		None => declaration.uri().to_string(),
	};
	if template.trim().is_empty() {
		return Err(Error::Build(format!(
			"{} has an empty URI",
			object.object_type().key().short_name()
		)));
	}

	let values = path_values(object, marshal)?;
	let substituted = substitute(&template, &values)?;
	join_base(base_uri, &substituted)
}

/// Value of the first URI-mapped member, if any is set.
fn uri_override(object: &dyn MappedObject, marshal: &MarshalContext<'_>) -> Result<Option<String>> {
	let members = get_mapped_members(&object.object_type(), MetadataKind::Uri, marshal.cache());
	if members.len() > 1 {
		tracing::warn!(
			type_name = object.object_type().key().short_name(),
			"several URI members declared, using the first"
		);
	}
	let Some(member) = members.first() else {
		return Ok(None);
	};
	match member.read(object) {
		Some(ValueRef::String(uri)) => Ok(Some(uri.to_string())),
		Some(ValueRef::Null) | None => Ok(None),
		Some(other) => Err(Error::Build(format!(
			"URI member {} must be a string, found {:?}",
			member.name(),
			other
		))),
	}
}

/// Encoded values of the URI path members, ordered by ordinal.
///
/// Ordinals must form the sequence `1..=N`.
fn path_values(object: &dyn MappedObject, marshal: &MarshalContext<'_>) -> Result<Vec<String>> {
	let members = get_mapped_members(&object.object_type(), MetadataKind::UriPath, marshal.cache());
	let mut ordered = Vec::with_capacity(members.len());
	for member in members.iter() {
		let ordinal = get_member_metadata(member, MetadataKind::UriPath, marshal.cache())
			.and_then(|metadata| metadata.ordinal)
			.unwrap_or_default();
		ordered.push((ordinal, member));
	}
	ordered.sort_by_key(|(ordinal, _)| *ordinal);

	let mut values = Vec::with_capacity(ordered.len());
	for (position, (ordinal, member)) in ordered.into_iter().enumerate() {
		if ordinal != position + 1 {
			return Err(Error::Build(format!(
				"URI path ordinals must be contiguous from 1, member {} has ordinal {} at position {}",
				member.name(),
				ordinal,
				position + 1
			)));
		}
		let view = member.read(object).ok_or_else(|| {
			Error::Build(format!("URI path member {} is not readable", member.name()))
		})?;
		values.push(path_value(member.name(), &view, member.member_type(), marshal)?);
	}
	Ok(values)
}

fn path_value(
	field: &str,
	view: &ValueRef<'_>,
	member_type: &battery_core::types::MemberType,
	marshal: &MarshalContext<'_>,
) -> Result<String> {
	if view.is_null() {
		return Err(Error::Build(format!("URI path member {field} is null")));
	}
	if let Some(adapter) = marshal.adapters().find(member_type.adapter_key()) {
		return adapter.encode(view).map(|encoded| encode_component(&encoded));
	}
	match view {
		ValueRef::String(value) => Ok(encode_component(value)),
		ValueRef::Integer(_)
		| ValueRef::Long(_)
		| ValueRef::Float(_)
		| ValueRef::Double(_)
		| ValueRef::Boolean(_) => Ok(view.to_text().unwrap_or_default()),
		other => Err(Error::Build(format!(
			"URI path member {} cannot be rendered: {:?}",
			field, other
		))),
	}
}

/// Replaces `{N}` with the N-th value and `{}` with the next value in order.
///
/// Other brace groups are kept as they are.
pub(crate) fn substitute(template: &str, values: &[String]) -> Result<String> {
	let mut result = String::with_capacity(template.len());
	let mut rest = template;
	let mut sequential = 0;

	while let Some(start) = rest.find('{') {
		result.push_str(&rest[..start]);
		let after = &rest[start + 1..];
		let Some(end) = after.find('}') else {
			result.push_str(&rest[start..]);
			return Ok(result);
		};

		let name = &after[..end];
		let ordinal = if name.is_empty() {
			sequential += 1;
			Some(sequential)
		} else {
			name.parse::<usize>().ok()
		};
		match ordinal {
			Some(ordinal) => {
				let value = ordinal
					.checked_sub(1)
					.and_then(|index| values.get(index))
					.ok_or_else(|| {
						Error::Build(format!("no URI path member for placeholder {{{}}}", name))
					})?;
				result.push_str(value);
			}
			None => {
				result.push('{');
				result.push_str(name);
				result.push('}');
			}
		}
		rest = &after[end + 1..];
	}

	result.push_str(rest);
	Ok(result)
}

/// Prefixes a relative URI with `base_uri`.
pub(crate) fn join_base(base_uri: Option<&str>, uri: &str) -> Result<String> {
	if uri.starts_with("http://") || uri.starts_with("https://") {
		return Ok(uri.to_string());
	}
	let base = base_uri.ok_or_else(|| {
		Error::Build(format!("relative URI {} requires a base URI", uri))
	})?;
	let base = base.strip_suffix('/').unwrap_or(base);
	let path = uri.strip_prefix('/').unwrap_or(uri);
	Ok(format!("{}/{}", base, path))
}
