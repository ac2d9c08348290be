//! Built-in naming conventions.

use super::NameTransformer;

/// Splits `input` into words at case and digit boundaries.
///
/// A run of capitals stays together as one word, except that its last
/// capital starts a new word when a lowercase letter follows
/// (`parseHTTPResponse` → `parse`, `HTTP`, `Response`).
pub fn split_by_case(input: &str) -> Vec<String> {
	let chars: Vec<char> = input.chars().collect();
	let mut words = Vec::new();
	let mut current = String::new();

	for (index, &c) in chars.iter().enumerate() {
		if index > 0 && is_boundary(chars[index - 1], c, chars.get(index + 1).copied()) {
			words.push(std::mem::take(&mut current));
		}
		current.push(c);
	}
	if !current.is_empty() {
		words.push(current);
	}
	words
}

fn is_boundary(previous: char, current: char, next: Option<char>) -> bool {
	if previous.is_ascii_digit() != current.is_ascii_digit() {
		return true;
	}
	is_case_boundary(previous, current, next)
}

/// Splits `input` at case boundaries only; digits stay with their word.
fn split_at_capitals(input: &str) -> Vec<String> {
	let chars: Vec<char> = input.chars().collect();
	let mut words = Vec::new();
	let mut current = String::new();

	for (index, &c) in chars.iter().enumerate() {
		if index > 0 && is_case_boundary(chars[index - 1], c, chars.get(index + 1).copied()) {
			words.push(std::mem::take(&mut current));
		}
		current.push(c);
	}
	if !current.is_empty() {
		words.push(current);
	}
	words
}

fn is_case_boundary(previous: char, current: char, next: Option<char>) -> bool {
	if !current.is_uppercase() {
		return false;
	}
	if previous.is_uppercase() {
		return next.is_some_and(char::is_lowercase);
	}
	previous.is_lowercase() || previous.is_ascii_digit()
}

/// Uppercases the first character and lowercases the rest.
pub(crate) fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
		None => String::new(),
	}
}

/// Leaves names untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl NameTransformer for Identity {
	fn decode(&self, name: &str) -> Vec<String> {
		vec![name.to_string()]
	}

	fn encode(&self, parts: &[String]) -> String {
		parts.concat()
	}
}

/// `lowerCamelCase`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCase;

impl NameTransformer for CamelCase {
	fn decode(&self, name: &str) -> Vec<String> {
		split_by_case(name)
	}

	fn encode(&self, parts: &[String]) -> String {
		parts
			.iter()
			.enumerate()
			.map(|(index, part)| {
				if index == 0 {
					part.to_lowercase()
				} else {
					capitalize(part)
				}
			})
			.collect()
	}
}

/// `UpperCamelCase`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PascalCase;

impl NameTransformer for PascalCase {
	fn decode(&self, name: &str) -> Vec<String> {
		split_by_case(name)
	}

	fn encode(&self, parts: &[String]) -> String {
		parts.iter().map(|part| capitalize(part)).collect()
	}
}

/// `snake_case`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

impl NameTransformer for SnakeCase {
	fn decode(&self, name: &str) -> Vec<String> {
		name.split('_')
			.filter(|part| !part.is_empty())
			.enumerate()
			.map(|(index, part)| {
				if index == 0 {
					part.to_string()
				} else {
					capitalize_first(part)
				}
			})
			.collect()
	}

	fn encode(&self, parts: &[String]) -> String {
		parts
			.iter()
			.flat_map(|part| split_at_capitals(part))
			.map(|word| word.to_lowercase())
			.collect::<Vec<_>>()
			.join("_")
	}
}

fn capitalize_first(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
