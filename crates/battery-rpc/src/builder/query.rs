//! Query-string members.

use battery_core::exception::Result;
use battery_core::marshaller::MarshalContext;
use battery_core::metadata::{MetadataKind, get_mapped_members, get_member_metadata};
use battery_core::types::{MappedObject, MemberType, ValueRef};

use crate::request::RequestDescriptor;

/// Appends a `key=value` pair per query-string member value.
///
/// Lists repeat their key and nulls are left out. Enums contribute their
/// variant name. Other members that are not adapter-encodable are logged and
/// skipped.
pub(crate) fn append_query(
	request: &mut RequestDescriptor,
	object: &dyn MappedObject,
	marshal: &MarshalContext<'_>,
) -> Result<()> {
	let cache = marshal.cache();
	let members = get_mapped_members(&object.object_type(), MetadataKind::QueryString, cache);

	for member in members.iter() {
		let Some(view) = member.read(object) else {
			continue;
		};
		let metadata = get_member_metadata(member, MetadataKind::QueryString, cache).unwrap_or_default();
		let key = match metadata.remote_name {
			Some(name) => name.to_string(),
			None => marshal.translator().local_to_remote(member.name()),
		};

		match &view {
			ValueRef::List(items) => {
				let element = member.member_type().element_type().unwrap_or(member.member_type());
				for item in items {
					if let Some(value) = query_value(member.name(), item, element, marshal)? {
						request.add_query(key.as_str(), value);
					}
				}
			}
			single => {
				if let Some(value) = query_value(member.name(), single, member.member_type(), marshal)? {
					request.add_query(key, value);
				}
			}
		}
	}
	Ok(())
}

fn query_value(
	field: &str,
	view: &ValueRef<'_>,
	member_type: &MemberType,
	marshal: &MarshalContext<'_>,
) -> Result<Option<String>> {
	if view.is_null() {
		return Ok(None);
	}
	if let Some(adapter) = marshal.adapters().find(member_type.adapter_key()) {
		return adapter.encode(view).map(Some);
	}
	match view {
		ValueRef::String(_)
		| ValueRef::Integer(_)
		| ValueRef::Long(_)
		| ValueRef::Float(_)
		| ValueRef::Double(_)
		| ValueRef::Boolean(_)
		| ValueRef::Enum(_) => Ok(view.to_text()),
		_ => {
			tracing::warn!(
				field,
				member_type = %member_type.describe(),
				"query string member cannot be built into the URI"
			);
			Ok(None)
		}
	}
}
