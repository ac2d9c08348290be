//! Recording transport.

use battery_core::exception::BoxError;
use battery_rpc::request::RequestDescriptor;
use battery_rpc::transport::{RawResponse, Transport};
use parking_lot::Mutex;

/// Returns queued responses in order and records every request it receives.
#[derive(Default)]
pub struct RecordingTransport {
	responses: Mutex<Vec<RawResponse>>,
	requests: Mutex<Vec<RequestDescriptor>>,
}

impl RecordingTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a response for the next request.
	pub fn respond(self, response: RawResponse) -> Self {
		self.responses.lock().push(response);
		self
	}

	/// Requests seen so far.
	pub fn requests(&self) -> Vec<RequestDescriptor> {
		self.requests.lock().clone()
	}
}

impl Transport for RecordingTransport {
	fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, BoxError> {
		self.requests.lock().push(request.clone());
		let mut responses = self.responses.lock();
		if responses.is_empty() {
			return Err("no response queued".into());
		}
		Ok(responses.remove(0))
	}
}
