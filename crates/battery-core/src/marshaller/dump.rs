//! Serialization: object graph → document.

use super::{FilterMode, Marshaller};
use crate::codec::DocumentEncoder;
use crate::exception::{Error, Result};
use crate::metadata::{MetadataKind, get_member_metadata};
use crate::types::{MappedObject, MemberType, ValueRef};

impl<E: DocumentEncoder> Marshaller<'_, E> {
	/// Serializes the members of `source` mapped as `kind`.
	///
	/// Returns `None` when no entry was emitted, so callers can tell "nothing
	/// to send" from an empty document. Nested objects are always emitted,
	/// even when empty.
	///
	/// # Errors
	///
	/// Returns [`Error::Serialization`] wrapping the first failure.
	pub fn dump(&self, source: &dyn MappedObject, kind: MetadataKind) -> Result<Option<E::Fragment>> {
		let entries = self
			.emit_entries(source, kind, FilterMode::Declared)
			.map_err(Error::into_serialization)?;
		if entries.is_empty() {
			tracing::debug!(
				type_name = source.object_type().key().short_name(),
				"no members to serialize"
			);
			return Ok(None);
		}
		Ok(Some(self.format.object(entries)))
	}

	fn emit_entries(
		&self,
		source: &dyn MappedObject,
		kind: MetadataKind,
		filter: FilterMode,
	) -> Result<Vec<(String, E::Fragment)>> {
		let members = self.context.members(&source.object_type(), kind, filter);
		let mut entries = Vec::with_capacity(members.len());

		for member in members.iter() {
			// setter members are write-only
			let Some(view) = member.read(source) else {
				continue;
			};
			let metadata =
				get_member_metadata(member, kind, self.context.cache()).unwrap_or_default();
			let key = match metadata.remote_name {
				Some(name) => name.to_string(),
				None => self.context.translator().local_to_remote(member.name()),
			};
			if let Some(fragment) = self.emit_value(&view, member.member_type(), member.name(), kind)? {
				entries.push((key, fragment));
			}
		}
		Ok(entries)
	}

	/// Encodes one value; `None` means the member is left out.
	fn emit_value(
		&self,
		view: &ValueRef<'_>,
		ty: &MemberType,
		field: &str,
		kind: MetadataKind,
	) -> Result<Option<E::Fragment>> {
		let format = self.format;
		let fragment = match view {
			ValueRef::Null => format.null(),
			ValueRef::String(v) => format.string(v),
			ValueRef::Integer(v) => format.integer(i64::from(*v)),
			ValueRef::Long(v) => format.integer(*v),
			ValueRef::Float(v) => format.float(f64::from(*v)),
			ValueRef::Double(v) => format.float(*v),
			ValueRef::Boolean(v) => format.boolean(*v),
			ValueRef::List(items) => {
				let element = ty.element_type().unwrap_or(ty);
				let mut fragments = Vec::with_capacity(items.len());
				for (index, item) in items.iter().enumerate() {
					let label = index.to_string();
					if matches!(item, ValueRef::List(_) | ValueRef::Map(_)) {
						self.context
							.unsupported(&label, "nested collection elements are not supported")?;
						continue;
					}
					if let Some(fragment) = self.emit_value(item, element, &label, kind)? {
						fragments.push(fragment);
					}
				}
				format.array(fragments)
			}
			ValueRef::Map(_) => {
				self.context
					.unsupported(field, "map serialization is not implemented")?;
				return Ok(None);
			}
			ValueRef::Enum(name) => format.string(name),
			ValueRef::Opaque(any) => {
				if let Some(adapter) = self.context.adapters().find(ty.adapter_key()) {
					format.string(&adapter.encode(view)?)
				} else if let Some(fragment) = format.opaque(*any) {
					fragment
				} else {
					self.context.unsupported(
						field,
						&format!("no type adapter registered for {}", ty.describe()),
					)?;
					return Ok(None);
				}
			}
			ValueRef::Object(object) => {
				if let Some(adapter) = self.context.adapters().find(ty.adapter_key()) {
					format.string(&adapter.encode(view)?)
				} else if object.object_type().key().is_platform_type() {
					tracing::debug!(field, "skipping platform type");
					return Ok(None);
				} else {
					let entries = self.emit_entries(*object, kind, FilterMode::All)?;
					format.object(entries)
				}
			}
		};
		Ok(Some(fragment))
	}
}
