//! Mapped types shared by the integration tests.

use battery_codecs::multipart::Attachment;
use battery_core::metadata::{RpcDeclaration, TypeDescriptor};
use battery_core::types::Mapped;
use battery_core::{mapped_enum, member};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
	Admin,
	#[default]
	Member,
	Guest,
}

mapped_enum!(Role { Admin, Member, Guest });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geo {
	pub lat: f64,
	pub lng: f64,
}

impl Mapped for Geo {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.member(member!(Geo, lat))
			.member(member!(Geo, lng))
			.build()
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
	pub street: String,
	pub city: String,
	pub geo: Option<Geo>,
}

impl Mapped for Address {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.member(member!(Address, street))
			.member(member!(Address, city))
			.member(member!(Address, geo))
			.build()
	}
}

/// Account resource: `PUT /accounts/{1}` with a JSON body, answered with the
/// stored account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
	pub account_id: i64,
	pub display_name: String,
	pub score: f64,
	pub active: bool,
	pub role: Role,
	pub tags: Vec<String>,
	pub address: Address,
	pub nickname: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl Mapped for Account {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(
				RpcDeclaration::put("/accounts/{1}")
					.with_serializer("application/json")
					.with_expected_content_type("application/json"),
			)
			.member(
				member!(Account, account_id)
					.uri_path(1)
					.request_body()
					.response()
					.required(),
			)
			.member(member!(Account, display_name).request_body().response())
			.member(member!(Account, score).request_body().response())
			.member(member!(Account, active).request_body().response())
			.member(member!(Account, role).request_body().response())
			.member(member!(Account, tags).request_body().response())
			.member(member!(Account, address).request_body().response())
			.member(member!(Account, nickname).request_body().response())
			.member(member!(Account, created_at).request_body().response())
			.build()
	}
}

/// `GET /search` driven by query-string members only.
#[derive(Debug, Clone, Default)]
pub struct Search {
	pub q: Option<String>,
	pub ids: Vec<i32>,
	pub role: Option<Role>,
	pub since: Option<DateTime<Utc>>,
	pub page_size: Option<i32>,
}

impl Mapped for Search {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(RpcDeclaration::get("/search"))
			.member(member!(Search, q).query())
			.member(member!(Search, ids).query())
			.member(member!(Search, role).query())
			.member(member!(Search, since).query())
			.member(member!(Search, page_size).query_as("per_page"))
			.build()
	}
}

/// Path members declared out of order: ordinals 3, 1, 2.
#[derive(Debug, Clone, Default)]
pub struct CommentPath {
	pub comment_id: i64,
	pub owner: String,
	pub repo: String,
}

impl Mapped for CommentPath {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(RpcDeclaration::delete("/repos/{1}/{2}/comments/{3}"))
			.member(member!(CommentPath, comment_id).uri_path(3))
			.member(member!(CommentPath, owner).uri_path(1))
			.member(member!(CommentPath, repo).uri_path(2))
			.build()
	}
}

/// Ordinals 1 and 3 with no 2.
#[derive(Debug, Clone, Default)]
pub struct BrokenPath {
	pub first: i32,
	pub third: i32,
}

impl Mapped for BrokenPath {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(RpcDeclaration::get("/{1}/{3}"))
			.member(member!(BrokenPath, first).uri_path(1))
			.member(member!(BrokenPath, third).uri_path(3))
			.build()
	}
}

/// Form login: `POST /session` with a URL-encoded body.
#[derive(Debug, Clone, Default)]
pub struct Login {
	pub user_name: String,
	pub password: String,
	pub remember_me: bool,
	pub scopes: Vec<String>,
}

impl Mapped for Login {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(RpcDeclaration::post("/session").with_serializer("application/x-www-form-urlencoded"))
			.member(member!(Login, user_name).request_body())
			.member(member!(Login, password).request_body())
			.member(member!(Login, remember_me).request_body())
			.member(member!(Login, scopes).request_body_as("scope"))
			.build()
	}
}

/// Avatar upload: `POST /accounts/{1}/avatar` as multipart form data.
#[derive(Debug, Clone, Default)]
pub struct AvatarUpload {
	pub account_id: i64,
	pub caption: String,
	pub image: Option<Attachment>,
}

impl Mapped for AvatarUpload {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(RpcDeclaration::post("/accounts/{1}/avatar").with_serializer("multipart/form-data"))
			.member(member!(AvatarUpload, account_id).uri_path(1))
			.member(member!(AvatarUpload, caption).request_body())
			.member(member!(AvatarUpload, image).request_body())
			.build()
	}
}

/// Response body nested three levels deep, read through a dotted key.
#[derive(Debug, Clone, Default)]
pub struct DeepValue {
	pub value: String,
	pub depth: Option<i32>,
}

impl Mapped for DeepValue {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.member(member!(DeepValue, value).response_as("a.b.c"))
			.member(member!(DeepValue, depth).response_as("meta.depth"))
			.build()
	}
}

/// Scalar targets for coercion checks.
#[derive(Debug, Clone, Default)]
pub struct Counters {
	pub count: i32,
	pub total: i64,
	pub ratio: f32,
	pub enabled: bool,
	pub label: String,
}

impl Mapped for Counters {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.member(member!(Counters, count).response())
			.member(member!(Counters, total).response())
			.member(member!(Counters, ratio).response())
			.member(member!(Counters, enabled).response())
			.member(member!(Counters, label).response())
			.build()
	}
}

/// Envelope whose payload is delivered through a response-object member.
#[derive(Debug, Clone, Default)]
pub struct AccountEnvelope {
	pub account: Account,
}

impl Mapped for AccountEnvelope {
	fn describe() -> TypeDescriptor {
		TypeDescriptor::builder::<Self>()
			.rpc(RpcDeclaration::get("/me").with_expected_content_type("application/json"))
			.member(member!(AccountEnvelope, account).response_object())
			.build()
	}
}
